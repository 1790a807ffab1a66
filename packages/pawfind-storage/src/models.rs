use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use pawfind_domain::ListingRecord;

/// One `listings` row with its images and colors aggregated in.
#[derive(Debug, sqlx::FromRow)]
pub struct ListingRow {
	pub listing_id: Uuid,
	pub author_id: Uuid,
	pub headline: String,
	pub description: String,
	pub location_text: String,
	pub event_date: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
	pub status_id: i64,
	pub species_id: i64,
	pub breed_id: Option<i64>,
	pub sex_id: Option<i64>,
	pub is_active: bool,
	pub image_urls: Vec<String>,
	pub color_ids: Vec<i64>,
}
impl From<ListingRow> for ListingRecord {
	fn from(row: ListingRow) -> Self {
		Self {
			id: row.listing_id,
			headline: row.headline,
			description: row.description,
			location_text: row.location_text,
			event_date: row.event_date,
			created_at: row.created_at,
			status_id: row.status_id,
			species_id: row.species_id,
			breed_id: row.breed_id,
			sex_id: row.sex_id,
			image_urls: row.image_urls,
			color_ids: row.color_ids.into_iter().collect(),
			author_id: row.author_id,
			is_active: row.is_active,
		}
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserProfile {
	pub user_id: Uuid,
	pub display_name: Option<String>,
	pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SavedSearchRow {
	pub saved_search_id: Uuid,
	pub owner_id: Uuid,
	pub name: String,
	pub filters: Value,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReferenceEntry {
	pub id: i64,
	pub label: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BreedEntry {
	pub breed_id: i64,
	pub species_id: i64,
	pub label: String,
}
