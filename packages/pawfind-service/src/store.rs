//! [`RecordStore`] over the Postgres schema.

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use pawfind_domain::ListingRecord;
use pawfind_storage::{
	db::Db,
	models::{ReferenceEntry, SavedSearchRow},
	queries::{self, ListingPageQuery, ReferenceTable},
};

use crate::{
	BoxFuture, FetchError, FetchPlan, ProfileRecord, RecordStore, ReferenceData, ReferenceItem,
	Result, StoredSearch,
};

pub struct PgRecordStore {
	db: Db,
}
impl PgRecordStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl RecordStore for PgRecordStore {
	fn fetch_page<'a>(
		&'a self,
		plan: &'a FetchPlan,
	) -> BoxFuture<'a, Result<Vec<ListingRecord>, FetchError>> {
		Box::pin(async move {
			let query = ListingPageQuery {
				constraints: plan.pushdown,
				sort_desc: plan.sort_desc,
				limit: plan.limit,
			};
			let rows = queries::fetch_listing_page(&self.db.pool, &query).await?;

			Ok(rows.into_iter().map(ListingRecord::from).collect())
		})
	}

	fn fetch_favorite_ids<'a>(
		&'a self,
		viewer_id: Uuid,
	) -> BoxFuture<'a, Result<HashSet<Uuid>, FetchError>> {
		Box::pin(async move {
			let ids = queries::fetch_favorite_ids(&self.db.pool, viewer_id).await?;

			Ok(ids.into_iter().collect())
		})
	}

	fn fetch_profiles<'a>(
		&'a self,
		author_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<HashMap<Uuid, ProfileRecord>, FetchError>> {
		Box::pin(async move {
			let rows = queries::fetch_profiles(&self.db.pool, author_ids).await?;

			Ok(rows
				.into_iter()
				.map(|row| {
					let profile =
						ProfileRecord { display_name: row.display_name, avatar_url: row.avatar_url };

					(row.user_id, profile)
				})
				.collect())
		})
	}

	fn fetch_reference_data<'a>(&'a self) -> BoxFuture<'a, Result<ReferenceData, FetchError>> {
		Box::pin(async move {
			let pool = &self.db.pool;
			let statuses = queries::list_reference_entries(pool, ReferenceTable::Statuses).await?;
			let species = queries::list_reference_entries(pool, ReferenceTable::Species).await?;
			let colors = queries::list_reference_entries(pool, ReferenceTable::Colors).await?;
			let sexes = queries::list_reference_entries(pool, ReferenceTable::Sexes).await?;
			let mut breeds = BTreeMap::<i64, Vec<ReferenceItem>>::new();

			for breed in queries::list_breeds(pool).await? {
				breeds
					.entry(breed.species_id)
					.or_default()
					.push(ReferenceItem { id: breed.breed_id, label: breed.label });
			}

			Ok(ReferenceData {
				statuses: items(statuses),
				species: items(species),
				breeds,
				colors: items(colors),
				sexes: items(sexes),
			})
		})
	}

	fn toggle_favorite<'a>(
		&'a self,
		viewer_id: Uuid,
		listing_id: Uuid,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(queries::toggle_favorite(&self.db, viewer_id, listing_id).await?) })
	}

	fn list_saved_searches<'a>(
		&'a self,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<StoredSearch>, FetchError>> {
		Box::pin(async move {
			let rows = queries::list_saved_searches(&self.db.pool, owner_id).await?;

			Ok(rows.into_iter().map(StoredSearch::from).collect())
		})
	}

	fn get_saved_search<'a>(
		&'a self,
		saved_search_id: Uuid,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<Option<StoredSearch>, FetchError>> {
		Box::pin(async move {
			let row = queries::get_saved_search(&self.db.pool, saved_search_id, owner_id).await?;

			Ok(row.map(StoredSearch::from))
		})
	}

	fn create_saved_search<'a>(
		&'a self,
		search: &'a StoredSearch,
		max_per_owner: u32,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let row = SavedSearchRow {
				saved_search_id: search.id,
				owner_id: search.owner_id,
				name: search.name.clone(),
				filters: search.filters.clone(),
				created_at: search.created_at,
			};

			queries::insert_saved_search(&self.db, &row, max_per_owner).await?;

			Ok(())
		})
	}

	fn delete_saved_search<'a>(
		&'a self,
		saved_search_id: Uuid,
		owner_id: Uuid,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			Ok(queries::delete_saved_search(&self.db.pool, saved_search_id, owner_id).await?)
		})
	}
}

impl From<SavedSearchRow> for StoredSearch {
	fn from(row: SavedSearchRow) -> Self {
		Self {
			id: row.saved_search_id,
			owner_id: row.owner_id,
			name: row.name,
			filters: row.filters,
			created_at: row.created_at,
		}
	}
}

fn items(entries: Vec<ReferenceEntry>) -> Vec<ReferenceItem> {
	entries.into_iter().map(|entry| ReferenceItem { id: entry.id, label: entry.label }).collect()
}
