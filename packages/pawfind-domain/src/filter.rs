//! Post-fetch filtering over a fetched page.
//!
//! Runs substring search first and color intersection second. Colors are never pushed down to
//! the record store, so this stage is the only place they are applied.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Constraint, FilterCriteria, ListingRecord, criteria};

/// The four id constraints of a [`FilterCriteria`], which a record store can evaluate natively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdConstraints {
	pub status: Constraint<i64>,
	pub species: Constraint<i64>,
	pub sex: Constraint<i64>,
	pub breed: Constraint<i64>,
}
impl IdConstraints {
	pub fn is_unconstrained(&self) -> bool {
		self.status.is_any() && self.species.is_any() && self.sex.is_any() && self.breed.is_any()
	}

	pub fn matches(&self, record: &ListingRecord) -> bool {
		self.status.matches_present(&record.status_id)
			&& self.species.matches_present(&record.species_id)
			&& self.sex.matches(record.sex_id.as_ref())
			&& self.breed.matches(record.breed_id.as_ref())
	}
}
impl From<&FilterCriteria> for IdConstraints {
	fn from(criteria: &FilterCriteria) -> Self {
		Self {
			status: criteria.status,
			species: criteria.species,
			sex: criteria.sex,
			breed: criteria.breed,
		}
	}
}

/// Row counts after each post-fetch step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterImpact {
	pub fetched: usize,
	pub after_search: usize,
	pub after_colors: usize,
}
impl FilterImpact {
	pub fn dropped_total(&self) -> usize {
		self.fetched.saturating_sub(self.after_colors)
	}
}

pub fn apply(
	records: Vec<ListingRecord>,
	criteria: &FilterCriteria,
) -> (Vec<ListingRecord>, FilterImpact) {
	let fetched = records.len();
	let records = match criteria.query.as_ref() {
		Some(query) => {
			let needle = query.folded();

			records.into_iter().filter(|record| matches_query(record, &needle)).collect()
		},
		None => records,
	};
	let after_search = records.len();
	let records: Vec<_> = if criteria.colors.is_empty() {
		records
	} else {
		records.into_iter().filter(|record| matches_colors(record, &criteria.colors)).collect()
	};
	let after_colors = records.len();

	(records, FilterImpact { fetched, after_search, after_colors })
}

/// `needle` must already be folded with [`crate::SearchQuery::folded`].
pub fn matches_query(record: &ListingRecord, needle: &str) -> bool {
	if needle.is_empty() {
		return true;
	}

	[&record.headline, &record.description, &record.location_text]
		.into_iter()
		.any(|field| criteria::fold(field).contains(needle))
}

/// A record passes when it shares at least one color with `selected`; an empty selection passes
/// everything.
pub fn matches_colors(record: &ListingRecord, selected: &BTreeSet<i64>) -> bool {
	selected.is_empty() || !record.color_ids.is_disjoint(selected)
}
