//! Author display data for a ranked page, resolved with one batched lookup.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawfind_domain::ListingRecord;

use crate::{FetchError, PawfindService, Result};

/// Display name used when an author has no usable profile.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

const NULL_AVATARS: [&str; 3] = ["none", "null", "undefined"];

/// A profile as stored. Either field may be missing or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
	pub display_name: Option<String>,
	pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
	pub id: Uuid,
	pub display_name: String,
	pub avatar_url: Option<String>,
	/// False when the fallback was applied.
	pub resolved: bool,
}

impl PawfindService {
	/// An empty page issues no lookup.
	pub(crate) async fn load_profiles(
		&self,
		author_ids: &[Uuid],
	) -> Result<HashMap<Uuid, ProfileRecord>, FetchError> {
		if author_ids.is_empty() {
			return Ok(HashMap::new());
		}

		self.bounded(self.store.fetch_profiles(author_ids)).await
	}
}

/// Distinct author ids of `records`, ascending.
pub fn distinct_authors(records: &[ListingRecord]) -> Vec<Uuid> {
	records.iter().map(|record| record.author_id).collect::<BTreeSet<_>>().into_iter().collect()
}

pub fn resolve(author_id: Uuid, profile: Option<&ProfileRecord>) -> Author {
	let display_name = profile
		.and_then(|profile| profile.display_name.as_deref())
		.map(str::trim)
		.filter(|name| !name.is_empty());
	let Some(display_name) = display_name else {
		return Author {
			id: author_id,
			display_name: UNKNOWN_AUTHOR.to_string(),
			avatar_url: None,
			resolved: false,
		};
	};

	Author {
		id: author_id,
		display_name: display_name.to_string(),
		avatar_url: profile.and_then(|profile| clean_avatar(profile.avatar_url.as_deref())),
		resolved: true,
	}
}

fn clean_avatar(raw: Option<&str>) -> Option<String> {
	let url = raw?.trim();

	if url.is_empty() || NULL_AVATARS.iter().any(|null| url.eq_ignore_ascii_case(null)) {
		return None;
	}

	Some(url.to_string())
}
