//! Flat persisted form of [`FilterCriteria`] for saved searches.
//!
//! Only non-default fields are written. Ids are stored verbatim: sentinel handling belongs to
//! the normalizer, so decoding an encoded map always yields the criteria it came from.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::{Constraint, DEFAULT_LIMIT, FilterCriteria, SearchQuery, SortMode};

pub const KEY_SEARCH_QUERY: &str = "search_query";
pub const KEY_STATUS_ID: &str = "status_id";
pub const KEY_SPECIES_ID: &str = "species_id";
pub const KEY_BREED_ID: &str = "breed_id";
pub const KEY_SEX_ID: &str = "sex_id";
pub const KEY_COLORS: &str = "colors";
pub const KEY_SORT: &str = "sort";
pub const KEY_LIMIT: &str = "limit";
pub const KEY_STATUS_UNSPECIFIED: &str = "status_unspecified";
pub const KEY_SPECIES_UNSPECIFIED: &str = "species_unspecified";
pub const KEY_BREED_UNSPECIFIED: &str = "breed_unspecified";
pub const KEY_SEX_UNSPECIFIED: &str = "sex_unspecified";

// Written by the previous client as `"<key>": "keine_angabe"`.
const LEGACY_BREED_KEY: &str = "rasse";
const LEGACY_SEX_KEY: &str = "geschlecht";
const LEGACY_UNSPECIFIED: &str = "keine_angabe";

const KNOWN_KEYS: [&str; 14] = [
	KEY_SEARCH_QUERY,
	KEY_STATUS_ID,
	KEY_SPECIES_ID,
	KEY_BREED_ID,
	KEY_SEX_ID,
	KEY_COLORS,
	KEY_SORT,
	KEY_LIMIT,
	KEY_STATUS_UNSPECIFIED,
	KEY_SPECIES_UNSPECIFIED,
	KEY_BREED_UNSPECIFIED,
	KEY_SEX_UNSPECIFIED,
	LEGACY_BREED_KEY,
	LEGACY_SEX_KEY,
];

/// Which [`FilterCriteria`] field a constraint key pair belongs to.
struct ConstraintKeys {
	id: &'static str,
	unspecified: &'static str,
	legacy: Option<&'static str>,
}

const STATUS_KEYS: ConstraintKeys =
	ConstraintKeys { id: KEY_STATUS_ID, unspecified: KEY_STATUS_UNSPECIFIED, legacy: None };
const SPECIES_KEYS: ConstraintKeys =
	ConstraintKeys { id: KEY_SPECIES_ID, unspecified: KEY_SPECIES_UNSPECIFIED, legacy: None };
const BREED_KEYS: ConstraintKeys = ConstraintKeys {
	id: KEY_BREED_ID,
	unspecified: KEY_BREED_UNSPECIFIED,
	legacy: Some(LEGACY_BREED_KEY),
};
const SEX_KEYS: ConstraintKeys = ConstraintKeys {
	id: KEY_SEX_ID,
	unspecified: KEY_SEX_UNSPECIFIED,
	legacy: Some(LEGACY_SEX_KEY),
};

pub fn encode(criteria: &FilterCriteria) -> Map<String, Value> {
	let mut out = Map::new();

	if let Some(query) = criteria.query.as_ref() {
		out.insert(KEY_SEARCH_QUERY.to_string(), Value::from(query.as_str()));
	}

	encode_constraint(&mut out, &STATUS_KEYS, criteria.status);
	encode_constraint(&mut out, &SPECIES_KEYS, criteria.species);
	encode_constraint(&mut out, &BREED_KEYS, criteria.breed);
	encode_constraint(&mut out, &SEX_KEYS, criteria.sex);

	if !criteria.colors.is_empty() {
		let colors = criteria.colors.iter().copied().map(Value::from).collect();

		out.insert(KEY_COLORS.to_string(), Value::Array(colors));
	}
	if criteria.sort != SortMode::default() {
		out.insert(KEY_SORT.to_string(), Value::from(criteria.sort.as_str()));
	}
	if criteria.limit != DEFAULT_LIMIT {
		out.insert(KEY_LIMIT.to_string(), Value::from(criteria.limit));
	}

	out
}

pub fn decode(map: &Map<String, Value>) -> FilterCriteria {
	FilterCriteria {
		status: decode_constraint(map, &STATUS_KEYS),
		species: decode_constraint(map, &SPECIES_KEYS),
		sex: decode_constraint(map, &SEX_KEYS),
		breed: decode_constraint(map, &BREED_KEYS),
		query: map.get(KEY_SEARCH_QUERY).and_then(Value::as_str).and_then(SearchQuery::parse),
		colors: map.get(KEY_COLORS).map(decode_colors).unwrap_or_default(),
		sort: map
			.get(KEY_SORT)
			.and_then(Value::as_str)
			.and_then(SortMode::parse)
			.unwrap_or_default(),
		limit: map
			.get(KEY_LIMIT)
			.and_then(Value::as_u64)
			.and_then(|limit| u32::try_from(limit).ok())
			.unwrap_or(DEFAULT_LIMIT),
	}
}

/// Decodes a stored `filters` column, which older rows hold as a JSON string.
pub fn decode_value(value: &Value) -> FilterCriteria {
	match value {
		Value::Object(map) => decode(map),
		Value::String(raw) => match serde_json::from_str::<Value>(raw) {
			Ok(Value::Object(map)) => decode(&map),
			_ => FilterCriteria::default(),
		},
		_ => FilterCriteria::default(),
	}
}

/// Keys present in `map` that this codec does not read.
pub fn unknown_keys(map: &Map<String, Value>) -> Vec<&str> {
	map.keys().map(String::as_str).filter(|key| !KNOWN_KEYS.contains(key)).collect()
}

fn encode_constraint(out: &mut Map<String, Value>, keys: &ConstraintKeys, value: Constraint<i64>) {
	match value {
		Constraint::Any => {},
		Constraint::Unspecified => {
			out.insert(keys.unspecified.to_string(), Value::Bool(true));
		},
		Constraint::Value(id) => {
			out.insert(keys.id.to_string(), Value::from(id));
		},
	}
}

fn decode_constraint(map: &Map<String, Value>, keys: &ConstraintKeys) -> Constraint<i64> {
	if let Some(id) = map.get(keys.id).and_then(read_id) {
		return Constraint::Value(id);
	}

	let flagged = map.get(keys.unspecified).and_then(Value::as_bool).unwrap_or(false);
	let legacy = keys
		.legacy
		.and_then(|key| map.get(key))
		.and_then(Value::as_str)
		.is_some_and(|value| value == LEGACY_UNSPECIFIED);

	if flagged || legacy { Constraint::Unspecified } else { Constraint::Any }
}

fn decode_colors(value: &Value) -> BTreeSet<i64> {
	match value {
		Value::Array(items) => items.iter().filter_map(read_id).collect(),
		_ => BTreeSet::new(),
	}
}

/// Only positive ids are real; zero and negative ids were "no constraint" in older payloads.
fn read_id(value: &Value) -> Option<i64> {
	let id = match value {
		Value::Number(number) => number.as_i64(),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	};

	id.filter(|id| *id > 0)
}
