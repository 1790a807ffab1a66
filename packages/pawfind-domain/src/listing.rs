use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One lost-or-found report as fetched from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
	pub id: Uuid,
	pub headline: String,
	pub description: String,
	pub location_text: String,
	#[serde(default, with = "crate::time_serde::option")]
	pub event_date: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub status_id: i64,
	pub species_id: i64,
	pub breed_id: Option<i64>,
	pub sex_id: Option<i64>,
	#[serde(default)]
	pub image_urls: Vec<String>,
	#[serde(default)]
	pub color_ids: BTreeSet<i64>,
	pub author_id: Uuid,
	pub is_active: bool,
}
impl ListingRecord {
	/// Sort key for event-date orderings: the event date when known, else the creation time.
	pub fn effective_event_date(&self) -> OffsetDateTime {
		self.event_date.unwrap_or(self.created_at)
	}
}
