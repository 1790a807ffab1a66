//! Read-through cache for the small lookup tables (statuses, species, breeds, colors, sexes).
//!
//! One [`ReferenceCache`] lives inside the service for the life of the process. The first read
//! loads from the record store; later reads are served from memory until [`ReferenceCache::invalidate`]
//! is called or the optional TTL elapses. A failed load leaves the cache empty.

use std::{
	collections::BTreeMap,
	future::Future,
	sync::Arc,
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{FetchError, PawfindService, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
	pub id: i64,
	pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
	pub statuses: Vec<ReferenceItem>,
	pub species: Vec<ReferenceItem>,
	/// Keyed by species id.
	pub breeds: BTreeMap<i64, Vec<ReferenceItem>>,
	pub colors: Vec<ReferenceItem>,
	pub sexes: Vec<ReferenceItem>,
}
struct Cached {
	data: Arc<ReferenceData>,
	loaded_at: Instant,
}

pub struct ReferenceCache {
	ttl: Option<Duration>,
	slot: Mutex<Option<Cached>>,
}
impl ReferenceCache {
	pub fn new(ttl: Option<Duration>) -> Self {
		Self { ttl, slot: Mutex::new(None) }
	}

	/// Returns the cached tables, calling `load` when empty or expired.
	///
	/// Concurrent callers wait for a single load.
	pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<ReferenceData>, FetchError>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<ReferenceData, FetchError>>,
	{
		let mut slot = self.slot.lock().await;

		if let Some(cached) = slot.as_ref()
			&& !self.is_expired(cached)
		{
			return Ok(cached.data.clone());
		}

		let data = Arc::new(load().await?);

		*slot = Some(Cached { data: data.clone(), loaded_at: Instant::now() });

		Ok(data)
	}

	pub async fn invalidate(&self) {
		*self.slot.lock().await = None;
	}

	pub async fn is_loaded(&self) -> bool {
		self.slot.lock().await.as_ref().is_some_and(|cached| !self.is_expired(cached))
	}

	fn is_expired(&self, cached: &Cached) -> bool {
		self.ttl.is_some_and(|ttl| cached.loaded_at.elapsed() >= ttl)
	}
}

impl PawfindService {
	pub async fn reference_data(&self) -> Result<Arc<ReferenceData>> {
		let data = self
			.references
			.get_or_load(|| self.bounded(self.store.fetch_reference_data()))
			.await?;

		Ok(data)
	}

	pub async fn invalidate_reference_data(&self) {
		let was_loaded = self.references.is_loaded().await;

		self.references.invalidate().await;

		tracing::info!(was_loaded, "Reference data cache invalidated.");
	}
}
