//! Pure discovery logic for lost-and-found listings.
//!
//! Nothing in this crate performs I/O. The record store, favorites and author profiles are
//! supplied by callers; this crate turns criteria plus a fetched page into an ordered result.

pub mod codec;
pub mod constraint;
pub mod criteria;
pub mod filter;
pub mod listing;
pub mod normalize;
pub mod ranking;
pub mod time_serde;

pub use constraint::Constraint;
pub use criteria::{
	DEFAULT_LIMIT, FilterCriteria, MAX_LIMIT, MAX_QUERY_CHARS, SearchQuery, SortMode,
};
pub use filter::IdConstraints;
pub use listing::ListingRecord;
pub use normalize::{RawCriteria, RawValue};
