use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Listing {listing_id} does not exist.")]
	ListingNotFound { listing_id: Uuid },
	#[error("Owner {owner_id} already holds {held} saved searches (limit {limit}).")]
	SavedSearchLimit { owner_id: Uuid, held: i64, limit: u32 },
}
