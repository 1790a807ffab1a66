//! Per-viewer discovery cycle tokens.
//!
//! A viewer may start a new cycle before the previous one finished. Each cycle takes a token at
//! start; only the most recently started cycle's token stays latest, and callers drop results
//! whose token is stale. Anonymous viewers share one sequence.

use std::{collections::HashMap, sync::Mutex};

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleToken {
	pub viewer_id: Option<Uuid>,
	pub seq: u64,
}

#[derive(Debug, Default)]
struct Sequences {
	next: u64,
	/// Newest started cycle per viewer, only while it is in flight.
	in_flight: HashMap<Option<Uuid>, u64>,
}

#[derive(Debug, Default)]
pub struct CycleSequencer {
	inner: Mutex<Sequences>,
}
impl CycleSequencer {
	/// Issues the next token for `viewer_id`.
	///
	/// Sequence numbers come from one counter shared by all viewers, so they keep increasing for a
	/// viewer after its entry was evicted. The first token is 1.
	pub fn begin(&self, viewer_id: Option<Uuid>) -> CycleToken {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());

		inner.next += 1;

		let seq = inner.next;

		inner.in_flight.insert(viewer_id, seq);

		CycleToken { viewer_id, seq }
	}

	/// Marks the cycle as done and reports whether it was still the viewer's newest one.
	///
	/// The viewer's entry is removed when the newest cycle finishes. An older token finishing
	/// later finds no entry, or a newer one, and is stale either way.
	/// A cycle dropped before `finish` keeps its entry until the viewer's next cycle finishes.
	pub fn finish(&self, token: &CycleToken) -> bool {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());

		if inner.in_flight.get(&token.viewer_id) == Some(&token.seq) {
			inner.in_flight.remove(&token.viewer_id);

			return true;
		}

		false
	}

	pub fn in_flight(&self) -> usize {
		self.inner.lock().unwrap_or_else(|err| err.into_inner()).in_flight.len()
	}
}
