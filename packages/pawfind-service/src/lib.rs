//! The discovery cycle and the operations around it.
//!
//! [`PawfindService`] owns the configuration, the [`RecordStore`] seam, the reference-data cache
//! and the per-viewer cycle sequencer. Every read a cycle issues goes through the store and
//! returns [`FetchError`]; the cycle either completes in full or fails closed.

pub mod annotate;
pub mod cycle;
pub mod discover;
pub mod enrich;
pub mod favorites;
pub mod memory;
pub mod planner;
pub mod reference;
pub mod saved_search;
pub mod store;

mod error;

pub use annotate::FavoriteIdSet;
pub use cycle::{CycleSequencer, CycleToken};
pub use discover::{DiscoverRequest, DiscoverResponse, DiscoveredListing};
pub use enrich::{Author, ProfileRecord, UNKNOWN_AUTHOR};
pub use error::{Error, FetchError, Result};
pub use favorites::{ToggleFavoriteRequest, ToggleFavoriteResponse};
pub use memory::MemoryRecordStore;
pub use planner::{FetchPlan, SortColumn};
pub use reference::{ReferenceCache, ReferenceData, ReferenceItem};
pub use saved_search::{CreateSavedSearchRequest, SavedSearch, StoredSearch};
pub use store::PgRecordStore;

use std::{
	collections::{HashMap, HashSet},
	future::Future,
	pin::Pin,
	sync::Arc,
	time::Duration,
};

use uuid::Uuid;

use pawfind_config::Config;
use pawfind_domain::ListingRecord;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence as seen by the service.
///
/// Reads return [`FetchError`] so a discovery cycle can apply its failure policy in one place.
/// Writes return the service [`Error`] because they can also be refused (missing listing, owner
/// quota).
pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Active listings matching the plan's pushdown, ordered by its sort column, capped at its limit.
	fn fetch_page<'a>(
		&'a self,
		plan: &'a FetchPlan,
	) -> BoxFuture<'a, Result<Vec<ListingRecord>, FetchError>>;

	fn fetch_favorite_ids<'a>(
		&'a self,
		viewer_id: Uuid,
	) -> BoxFuture<'a, Result<HashSet<Uuid>, FetchError>>;

	/// One batched lookup. Ids without a profile are simply absent from the map.
	fn fetch_profiles<'a>(
		&'a self,
		author_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<HashMap<Uuid, ProfileRecord>, FetchError>>;

	fn fetch_reference_data<'a>(&'a self) -> BoxFuture<'a, Result<ReferenceData, FetchError>>;

	/// Returns the favorite state the store holds after the toggle.
	fn toggle_favorite<'a>(
		&'a self,
		viewer_id: Uuid,
		listing_id: Uuid,
	) -> BoxFuture<'a, Result<bool>>;

	fn list_saved_searches<'a>(
		&'a self,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<StoredSearch>, FetchError>>;

	fn get_saved_search<'a>(
		&'a self,
		saved_search_id: Uuid,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<Option<StoredSearch>, FetchError>>;

	/// Fails with [`Error::Conflict`] when the owner already holds `max_per_owner` searches.
	fn create_saved_search<'a>(
		&'a self,
		search: &'a StoredSearch,
		max_per_owner: u32,
	) -> BoxFuture<'a, Result<()>>;

	/// Returns whether a saved search was removed.
	fn delete_saved_search<'a>(
		&'a self,
		saved_search_id: Uuid,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<bool>>;
}

pub struct PawfindService {
	pub cfg: Config,
	pub store: Arc<dyn RecordStore>,
	pub references: ReferenceCache,
	pub cycles: CycleSequencer,
}
impl PawfindService {
	pub fn new(cfg: Config, store: Arc<dyn RecordStore>) -> Self {
		let references = ReferenceCache::new(cfg.reference.ttl_seconds.map(Duration::from_secs));

		Self { cfg, store, references, cycles: CycleSequencer::default() }
	}

	/// Applies `discovery.fetch_timeout_ms` to one record store read.
	pub(crate) async fn bounded<T, F>(&self, fut: F) -> Result<T, FetchError>
	where
		F: Future<Output = Result<T, FetchError>>,
	{
		let Some(millis) = self.cfg.discovery.fetch_timeout_ms else {
			return fut.await;
		};

		tokio::time::timeout(Duration::from_millis(millis), fut)
			.await
			.map_err(|_| FetchError::Timeout { millis })?
	}
}
