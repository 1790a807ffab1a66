//! Raw UI values to canonical [`FilterCriteria`].
//!
//! Normalization never fails. Anything that cannot be read as a constraint degrades to
//! [`Constraint::Any`], and any unreadable limit or sort falls back to its default.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Constraint, DEFAULT_LIMIT, FilterCriteria, MAX_LIMIT, SearchQuery, SortMode};

const ANY_SENTINELS: [&str; 4] = ["all", "alle", "any", "*"];
const UNSPECIFIED_SENTINELS: [&str; 4] = ["unspecified", "keine_angabe", "none", "null"];

/// One loosely typed value as submitted by a form or a query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
	Int(i64),
	Text(String),
	List(Vec<RawValue>),
	Other(Value),
}
impl From<i64> for RawValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<&str> for RawValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCriteria {
	#[serde(default)]
	pub status: Option<RawValue>,
	#[serde(default)]
	pub species: Option<RawValue>,
	#[serde(default)]
	pub sex: Option<RawValue>,
	#[serde(default)]
	pub breed: Option<RawValue>,
	#[serde(default)]
	pub query: Option<RawValue>,
	#[serde(default)]
	pub colors: Option<RawValue>,
	#[serde(default)]
	pub sort: Option<RawValue>,
	#[serde(default)]
	pub limit: Option<RawValue>,
}

/// Which way an id field was read, kept so callers can log degraded input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degraded {
	/// A value was present but unreadable and became `Any`.
	Malformed(&'static str),
	/// "Unspecified" was requested on a field that is never absent and became `Any`.
	UnspecifiedOnRequiredField(&'static str),
}

pub fn normalize(raw: &RawCriteria) -> FilterCriteria {
	normalize_with_report(raw).0
}

/// Like [`normalize`], also reporting every field that had to be degraded.
pub fn normalize_with_report(raw: &RawCriteria) -> (FilterCriteria, Vec<Degraded>) {
	let mut degraded = Vec::new();
	let criteria = FilterCriteria {
		status: id_constraint("status", raw.status.as_ref(), false, &mut degraded),
		species: id_constraint("species", raw.species.as_ref(), false, &mut degraded),
		sex: id_constraint("sex", raw.sex.as_ref(), true, &mut degraded),
		breed: id_constraint("breed", raw.breed.as_ref(), true, &mut degraded),
		query: raw.query.as_ref().and_then(query),
		colors: raw.colors.as_ref().map(colors).unwrap_or_default(),
		sort: raw.sort.as_ref().and_then(sort).unwrap_or_default(),
		limit: limit(raw.limit.as_ref(), &mut degraded),
	};

	(criteria, degraded)
}

fn id_constraint(
	field: &'static str,
	raw: Option<&RawValue>,
	nullable: bool,
	degraded: &mut Vec<Degraded>,
) -> Constraint<i64> {
	let Some(raw) = raw else {
		return Constraint::Any;
	};

	match raw {
		RawValue::Int(id) => positive_id(*id),
		RawValue::Text(text) => {
			let text = text.trim().to_lowercase();

			if text.is_empty() || ANY_SENTINELS.contains(&text.as_str()) {
				return Constraint::Any;
			}
			if UNSPECIFIED_SENTINELS.contains(&text.as_str()) {
				if nullable {
					return Constraint::Unspecified;
				}

				degraded.push(Degraded::UnspecifiedOnRequiredField(field));

				return Constraint::Any;
			}

			match text.parse::<i64>() {
				Ok(id) => positive_id(id),
				Err(_) => {
					degraded.push(Degraded::Malformed(field));

					Constraint::Any
				},
			}
		},
		RawValue::List(_) | RawValue::Other(Value::Null) => Constraint::Any,
		RawValue::Other(_) => {
			degraded.push(Degraded::Malformed(field));

			Constraint::Any
		},
	}
}

fn positive_id(id: i64) -> Constraint<i64> {
	if id > 0 { Constraint::Value(id) } else { Constraint::Any }
}

fn query(raw: &RawValue) -> Option<SearchQuery> {
	match raw {
		RawValue::Text(text) => SearchQuery::parse(text),
		RawValue::Int(number) => SearchQuery::parse(&number.to_string()),
		RawValue::List(_) | RawValue::Other(_) => None,
	}
}

fn colors(raw: &RawValue) -> BTreeSet<i64> {
	let mut out = BTreeSet::new();

	collect_colors(raw, &mut out);

	out
}

fn collect_colors(raw: &RawValue, out: &mut BTreeSet<i64>) {
	match raw {
		RawValue::Int(id) if *id > 0 => {
			out.insert(*id);
		},
		RawValue::Text(text) =>
			for part in text.split(',') {
				if let Ok(id) = part.trim().parse::<i64>()
					&& id > 0
				{
					out.insert(id);
				}
			},
		RawValue::List(items) =>
			for item in items {
				collect_colors(item, out);
			},
		RawValue::Int(_) | RawValue::Other(_) => {},
	}
}

fn sort(raw: &RawValue) -> Option<SortMode> {
	match raw {
		RawValue::Text(text) => SortMode::parse(text),
		_ => None,
	}
}

fn limit(raw: Option<&RawValue>, degraded: &mut Vec<Degraded>) -> u32 {
	let requested = match raw {
		None | Some(RawValue::Other(Value::Null)) => return DEFAULT_LIMIT,
		Some(RawValue::Int(value)) => Some(*value),
		Some(RawValue::Text(text)) if text.trim().is_empty() => return DEFAULT_LIMIT,
		Some(RawValue::Text(text)) => text.trim().parse::<i64>().ok(),
		Some(RawValue::List(_) | RawValue::Other(_)) => None,
	};

	match requested {
		Some(value) if value > 0 => value.min(i64::from(MAX_LIMIT)) as u32,
		_ => {
			degraded.push(Degraded::Malformed("limit"));

			DEFAULT_LIMIT
		},
	}
}
