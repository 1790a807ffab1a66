//! A [`RecordStore`] held entirely in process memory.
//!
//! Evaluates the same pushdown and ordering contract as the Postgres store. Used for tests and
//! for running the API without a database.

use std::{
	collections::{HashMap, HashSet},
	sync::{Mutex, MutexGuard},
};

use uuid::Uuid;

use pawfind_domain::ListingRecord;

use crate::{
	BoxFuture, Error, FetchError, FetchPlan, ProfileRecord, RecordStore, ReferenceData, Result,
	StoredSearch,
};

#[derive(Debug, Default)]
struct MemoryState {
	listings: Vec<ListingRecord>,
	favorites: HashMap<Uuid, HashSet<Uuid>>,
	profiles: HashMap<Uuid, ProfileRecord>,
	saved_searches: Vec<StoredSearch>,
	reference: ReferenceData,
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
	state: Mutex<MemoryState>,
}
impl MemoryRecordStore {
	pub fn with_listings(listings: Vec<ListingRecord>) -> Self {
		let store = Self::default();

		store.lock().listings = listings;

		store
	}

	pub fn insert_listing(&self, listing: ListingRecord) {
		self.lock().listings.push(listing);
	}

	pub fn insert_profile(&self, user_id: Uuid, profile: ProfileRecord) {
		self.lock().profiles.insert(user_id, profile);
	}

	pub fn set_reference_data(&self, reference: ReferenceData) {
		self.lock().reference = reference;
	}

	pub fn favorite_ids(&self, viewer_id: Uuid) -> HashSet<Uuid> {
		self.lock().favorites.get(&viewer_id).cloned().unwrap_or_default()
	}

	fn lock(&self) -> MutexGuard<'_, MemoryState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn page(&self, plan: &FetchPlan) -> Vec<ListingRecord> {
		let state = self.lock();
		let mut page = state
			.listings
			.iter()
			.filter(|listing| plan.pushdown.matches(listing))
			.cloned()
			.collect::<Vec<_>>();

		page.sort_by(|a, b| {
			let created = a.created_at.cmp(&b.created_at);
			let created = if plan.sort_desc { created.reverse() } else { created };

			created.then_with(|| a.id.cmp(&b.id))
		});
		page.truncate(plan.limit as usize);

		page
	}
}
impl RecordStore for MemoryRecordStore {
	fn fetch_page<'a>(
		&'a self,
		plan: &'a FetchPlan,
	) -> BoxFuture<'a, Result<Vec<ListingRecord>, FetchError>> {
		let page = self.page(plan);

		Box::pin(async move { Ok(page) })
	}

	fn fetch_favorite_ids<'a>(
		&'a self,
		viewer_id: Uuid,
	) -> BoxFuture<'a, Result<HashSet<Uuid>, FetchError>> {
		let ids = self.favorite_ids(viewer_id);

		Box::pin(async move { Ok(ids) })
	}

	fn fetch_profiles<'a>(
		&'a self,
		author_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<HashMap<Uuid, ProfileRecord>, FetchError>> {
		let state = self.lock();
		let profiles = author_ids
			.iter()
			.filter_map(|id| state.profiles.get(id).map(|profile| (*id, profile.clone())))
			.collect::<HashMap<_, _>>();

		drop(state);

		Box::pin(async move { Ok(profiles) })
	}

	fn fetch_reference_data<'a>(&'a self) -> BoxFuture<'a, Result<ReferenceData, FetchError>> {
		let reference = self.lock().reference.clone();

		Box::pin(async move { Ok(reference) })
	}

	fn toggle_favorite<'a>(
		&'a self,
		viewer_id: Uuid,
		listing_id: Uuid,
	) -> BoxFuture<'a, Result<bool>> {
		let mut state = self.lock();
		let result = if state.listings.iter().any(|listing| listing.id == listing_id) {
			let favorites = state.favorites.entry(viewer_id).or_default();

			if favorites.remove(&listing_id) {
				Ok(false)
			} else {
				favorites.insert(listing_id);

				Ok(true)
			}
		} else {
			Err(Error::NotFound { message: format!("listing {listing_id}") })
		};

		drop(state);

		Box::pin(async move { result })
	}

	fn list_saved_searches<'a>(
		&'a self,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<StoredSearch>, FetchError>> {
		let mut searches = self
			.lock()
			.saved_searches
			.iter()
			.filter(|search| search.owner_id == owner_id)
			.cloned()
			.collect::<Vec<_>>();

		searches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

		Box::pin(async move { Ok(searches) })
	}

	fn get_saved_search<'a>(
		&'a self,
		saved_search_id: Uuid,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<Option<StoredSearch>, FetchError>> {
		let found = self
			.lock()
			.saved_searches
			.iter()
			.find(|search| search.id == saved_search_id && search.owner_id == owner_id)
			.cloned();

		Box::pin(async move { Ok(found) })
	}

	fn create_saved_search<'a>(
		&'a self,
		search: &'a StoredSearch,
		max_per_owner: u32,
	) -> BoxFuture<'a, Result<()>> {
		let mut state = self.lock();
		let held = state.saved_searches.iter().filter(|s| s.owner_id == search.owner_id).count();
		let result = if held >= max_per_owner as usize {
			Err(Error::Conflict {
				message: format!("owner {} already holds {held} saved searches", search.owner_id),
			})
		} else {
			state.saved_searches.push(search.clone());

			Ok(())
		};

		drop(state);

		Box::pin(async move { result })
	}

	fn delete_saved_search<'a>(
		&'a self,
		saved_search_id: Uuid,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<bool>> {
		let mut state = self.lock();
		let before = state.saved_searches.len();

		state
			.saved_searches
			.retain(|search| !(search.id == saved_search_id && search.owner_id == owner_id));

		let removed = state.saved_searches.len() < before;

		drop(state);

		Box::pin(async move { Ok(removed) })
	}
}
