//! Turns canonical criteria into one record store request.
//!
//! The id constraints and creation-time ordering are pushed down. Event-date orderings are not
//! answerable by the store, so those plans fetch newest first and require a client-side re-sort.
//! Search and color filters are never pushed down.

use serde::Serialize;

use pawfind_domain::{FilterCriteria, IdConstraints, SortMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
	CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchPlan {
	pub pushdown: IdConstraints,
	pub sort_column: SortColumn,
	pub sort_desc: bool,
	/// Hard cap on rows requested.
	pub limit: u32,
	/// Set when the store order differs from the requested order.
	pub client_sort_required: bool,
}

pub fn plan(criteria: &FilterCriteria, max_limit: u32) -> FetchPlan {
	let (sort_desc, client_sort_required) = match criteria.sort {
		SortMode::CreatedAsc => (false, false),
		SortMode::CreatedDesc => (true, false),
		SortMode::EventDateAsc | SortMode::EventDateDesc => (true, true),
	};

	FetchPlan {
		pushdown: IdConstraints::from(criteria),
		sort_column: SortColumn::CreatedAt,
		sort_desc,
		limit: criteria.limit.clamp(1, max_limit.max(1)),
		client_sort_required,
	}
}
