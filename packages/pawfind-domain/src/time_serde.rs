//! Serde helpers for listing timestamps.
//!
//! Timestamps are written as RFC 3339. Reads also accept a bare `YYYY-MM-DD` date, which older
//! clients stored for event dates, and place it at midnight UTC.

use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&value.format(&Rfc3339).map_err(S::Error::custom)?)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	parse(&String::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
	let raw = raw.trim();

	OffsetDateTime::parse(raw, &Rfc3339).or_else(|err| {
		time::Date::parse(raw, format_description!("[year]-[month]-[day]"))
			.map(|date| date.midnight().assume_utc())
			.map_err(|_| err)
	})
}

/// The same encoding for nullable timestamps. A blank string reads as `None`.
pub mod option {
	use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
	use time::OffsetDateTime;

	use super::parse;

	pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(value) => super::serialize(value, serializer),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Option::<String>::deserialize(deserializer)?
			.filter(|raw| !raw.trim().is_empty())
			.map(|raw| parse(&raw).map_err(D::Error::custom))
			.transpose()
	}
}
