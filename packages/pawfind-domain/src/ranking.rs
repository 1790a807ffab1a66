//! Deterministic ordering for discovery results.
//!
//! Primary key depends on the [`SortMode`]; the secondary key is always the record id ascending,
//! which makes the order total. Sorting is stable, so ranking an already ranked page is a no-op.

use std::cmp::Ordering;

use time::OffsetDateTime;

use crate::{ListingRecord, SortMode};

pub fn primary_key(record: &ListingRecord, mode: SortMode) -> OffsetDateTime {
	if mode.uses_event_date() { record.effective_event_date() } else { record.created_at }
}

pub fn compare(a: &ListingRecord, b: &ListingRecord, mode: SortMode) -> Ordering {
	let primary = primary_key(a, mode).cmp(&primary_key(b, mode));
	let primary = if mode.is_descending() { primary.reverse() } else { primary };

	primary.then_with(|| a.id.cmp(&b.id))
}

pub fn is_ranked(records: &[ListingRecord], mode: SortMode) -> bool {
	records.windows(2).all(|pair| compare(&pair[0], &pair[1], mode) != Ordering::Greater)
}

/// Orders `records` for `mode`.
///
/// When `resort_required` is false the store already ordered by the primary key, so the page is
/// only re-sorted if a tie was returned out of id order. Returns whether a sort was performed.
pub fn rank(records: &mut [ListingRecord], mode: SortMode, resort_required: bool) -> bool {
	if !resort_required && is_ranked(records, mode) {
		return false;
	}

	records.sort_by(|a, b| compare(a, b, mode));

	true
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;
	use uuid::Uuid;

	use super::*;

	fn record(id: u128, created_at: OffsetDateTime, event_date: Option<OffsetDateTime>) -> ListingRecord {
		ListingRecord {
			id: Uuid::from_u128(id),
			headline: format!("listing {id}"),
			description: String::new(),
			location_text: String::new(),
			event_date,
			created_at,
			status_id: 1,
			species_id: 1,
			breed_id: None,
			sex_id: None,
			image_urls: Vec::new(),
			color_ids: Default::default(),
			author_id: Uuid::from_u128(100),
			is_active: true,
		}
	}

	fn ids(records: &[ListingRecord]) -> Vec<u128> {
		records.iter().map(|record| record.id.as_u128()).collect()
	}

	#[test]
	fn created_desc_breaks_ties_by_id_ascending() {
		let same = datetime!(2024-05-01 12:00 UTC);
		let mut records = vec![
			record(3, same, None),
			record(1, same, None),
			record(2, datetime!(2024-06-01 12:00 UTC), None),
		];

		assert!(rank(&mut records, SortMode::CreatedDesc, false));
		assert_eq!(ids(&records), vec![2, 1, 3]);
	}

	#[test]
	fn event_date_desc_falls_back_to_created_at() {
		let mut records = vec![
			record(1, datetime!(2024-01-01 00:00 UTC), Some(datetime!(2023-06-01 00:00 UTC))),
			record(2, datetime!(2024-02-01 00:00 UTC), None),
			record(3, datetime!(2022-01-01 00:00 UTC), Some(datetime!(2024-03-01 00:00 UTC))),
		];

		rank(&mut records, SortMode::EventDateDesc, true);

		assert_eq!(ids(&records), vec![3, 2, 1]);
	}

	#[test]
	fn ranked_input_is_left_untouched() {
		let mut records = vec![
			record(1, datetime!(2024-02-01 00:00 UTC), None),
			record(2, datetime!(2024-01-01 00:00 UTC), None),
		];

		assert!(!rank(&mut records, SortMode::CreatedDesc, false));
		assert_eq!(ids(&records), vec![1, 2]);
	}

	#[test]
	fn ranking_twice_is_idempotent() {
		let mut records = vec![
			record(5, datetime!(2024-01-01 00:00 UTC), Some(datetime!(2024-01-01 00:00 UTC))),
			record(4, datetime!(2024-01-01 00:00 UTC), None),
			record(9, datetime!(2023-01-01 00:00 UTC), Some(datetime!(2024-01-01 00:00 UTC))),
		];

		rank(&mut records, SortMode::EventDateAsc, true);

		let first = records.clone();

		rank(&mut records, SortMode::EventDateAsc, true);

		assert_eq!(records, first);
		assert_eq!(ids(&records), vec![4, 5, 9]);
	}
}
