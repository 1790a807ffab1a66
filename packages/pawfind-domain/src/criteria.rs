use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unicode_normalization::UnicodeNormalization;

use crate::Constraint;

/// Longest query kept after normalization, in characters.
pub const MAX_QUERY_CHARS: usize = 200;
pub const DEFAULT_LIMIT: u32 = 30;
/// Ceiling for any requested result limit.
pub const MAX_LIMIT: u32 = 200;

/// A free-text query that has already been whitespace-collapsed, trimmed and truncated.
///
/// Only [`SearchQuery::parse`] constructs one, so every value is in normal form and parsing it
/// again is the identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);
impl SearchQuery {
	/// Returns `None` when nothing but whitespace remains.
	pub fn parse(raw: &str) -> Option<Self> {
		let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
		let truncated: String = collapsed.chars().take(MAX_QUERY_CHARS).collect();
		let trimmed = truncated.trim_end();

		if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Case- and composition-insensitive form used for containment tests.
	pub fn folded(&self) -> String {
		fold(&self.0)
	}
}
impl fmt::Debug for SearchQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.0, f)
	}
}
impl fmt::Display for SearchQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
impl Serialize for SearchQuery {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.0)
	}
}
impl<'de> Deserialize<'de> for SearchQuery {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("search query is blank"))
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
	#[serde(rename = "created_at_asc")]
	CreatedAsc,
	#[default]
	#[serde(rename = "created_at_desc")]
	CreatedDesc,
	#[serde(rename = "event_date_asc")]
	EventDateAsc,
	#[serde(rename = "event_date_desc")]
	EventDateDesc,
}
impl SortMode {
	pub const ALL: [Self; 4] =
		[Self::CreatedAsc, Self::CreatedDesc, Self::EventDateAsc, Self::EventDateDesc];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::CreatedAsc => "created_at_asc",
			Self::CreatedDesc => "created_at_desc",
			Self::EventDateAsc => "event_date_asc",
			Self::EventDateDesc => "event_date_desc",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|mode| mode.as_str().eq_ignore_ascii_case(raw))
	}

	pub fn is_descending(self) -> bool {
		matches!(self, Self::CreatedDesc | Self::EventDateDesc)
	}

	/// Event-date orderings cannot be answered by the record store.
	pub fn uses_event_date(self) -> bool {
		matches!(self, Self::EventDateAsc | Self::EventDateDesc)
	}
}

/// Canonical, sentinel-free search intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
	#[serde(default)]
	pub status: Constraint<i64>,
	#[serde(default)]
	pub species: Constraint<i64>,
	#[serde(default)]
	pub sex: Constraint<i64>,
	#[serde(default)]
	pub breed: Constraint<i64>,
	#[serde(default)]
	pub query: Option<SearchQuery>,
	#[serde(default)]
	pub colors: BTreeSet<i64>,
	#[serde(default)]
	pub sort: SortMode,
	#[serde(default = "default_limit")]
	pub limit: u32,
}
impl Default for FilterCriteria {
	fn default() -> Self {
		Self {
			status: Constraint::Any,
			species: Constraint::Any,
			sex: Constraint::Any,
			breed: Constraint::Any,
			query: None,
			colors: BTreeSet::new(),
			sort: SortMode::default(),
			limit: DEFAULT_LIMIT,
		}
	}
}

pub(crate) fn fold(text: &str) -> String {
	text.nfc().collect::<String>().to_lowercase()
}

fn default_limit() -> u32 {
	DEFAULT_LIMIT
}
