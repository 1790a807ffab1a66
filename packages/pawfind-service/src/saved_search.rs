//! Named, persisted criteria owned by one user.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use pawfind_domain::{FilterCriteria, RawCriteria, codec, normalize};

use crate::{DiscoverResponse, Error, PawfindService, Result};

/// A saved search as persisted, with its criteria still in codec form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSearch {
	pub id: Uuid,
	pub owner_id: Uuid,
	pub name: String,
	pub filters: Value,
	#[serde(with = "pawfind_domain::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedSearch {
	pub id: Uuid,
	pub owner_id: Uuid,
	pub name: String,
	pub criteria: FilterCriteria,
	#[serde(with = "pawfind_domain::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<StoredSearch> for SavedSearch {
	fn from(stored: StoredSearch) -> Self {
		if let Value::Object(map) = &stored.filters {
			let unknown = codec::unknown_keys(map);

			if !unknown.is_empty() {
				tracing::debug!(
					saved_search_id = %stored.id,
					?unknown,
					"Ignoring unknown saved search keys."
				);
			}
		}

		Self {
			id: stored.id,
			owner_id: stored.owner_id,
			name: stored.name,
			criteria: codec::decode_value(&stored.filters),
			created_at: stored.created_at,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSavedSearchRequest {
	pub owner_id: Uuid,
	pub name: String,
	#[serde(default)]
	pub criteria: RawCriteria,
}

impl PawfindService {
	pub async fn create_saved_search(&self, req: CreateSavedSearchRequest) -> Result<SavedSearch> {
		let name = self.validate_name(&req.name)?;
		let criteria = normalize::normalize(&req.criteria);
		let stored = StoredSearch {
			id: Uuid::new_v4(),
			owner_id: req.owner_id,
			name,
			filters: Value::Object(codec::encode(&criteria)),
			created_at: OffsetDateTime::now_utc(),
		};

		self.store.create_saved_search(&stored, self.cfg.saved_search.max_per_owner).await?;

		tracing::info!(
			saved_search_id = %stored.id,
			owner_id = %stored.owner_id,
			"Saved search created."
		);

		Ok(SavedSearch::from(stored))
	}

	/// Newest first; equal timestamps fall back to id order.
	pub async fn list_saved_searches(&self, owner_id: Uuid) -> Result<Vec<SavedSearch>> {
		let mut stored = self.bounded(self.store.list_saved_searches(owner_id)).await?;

		stored.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

		Ok(stored.into_iter().map(SavedSearch::from).collect())
	}

	pub async fn get_saved_search(&self, saved_search_id: Uuid, owner_id: Uuid) -> Result<SavedSearch> {
		let stored = self
			.bounded(self.store.get_saved_search(saved_search_id, owner_id))
			.await?
			.ok_or_else(|| Error::NotFound {
				message: format!("saved search {saved_search_id}"),
			})?;

		Ok(SavedSearch::from(stored))
	}

	pub async fn delete_saved_search(&self, saved_search_id: Uuid, owner_id: Uuid) -> Result<()> {
		if !self.store.delete_saved_search(saved_search_id, owner_id).await? {
			return Err(Error::NotFound { message: format!("saved search {saved_search_id}") });
		}

		tracing::info!(%saved_search_id, %owner_id, "Saved search deleted.");

		Ok(())
	}

	/// Runs a discovery cycle for the owner with the saved criteria.
	pub async fn replay_saved_search(
		&self,
		saved_search_id: Uuid,
		owner_id: Uuid,
	) -> Result<DiscoverResponse> {
		let saved = self.get_saved_search(saved_search_id, owner_id).await?;

		self.run_cycle(Some(owner_id), saved.criteria).await
	}

	fn validate_name(&self, raw: &str) -> Result<String> {
		let name = raw.trim();
		let max_chars = self.cfg.saved_search.max_name_chars as usize;

		if name.is_empty() {
			return Err(Error::InvalidRequest {
				field: "name",
				message: "Saved search name must not be empty.".to_string(),
			});
		}
		if name.chars().count() > max_chars {
			return Err(Error::InvalidRequest {
				field: "name",
				message: format!("Saved search name must be at most {max_chars} characters."),
			});
		}

		Ok(name.to_string())
	}
}
