use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use pawfind_domain::{Constraint, IdConstraints};

use crate::{
	Error, Result,
	db::Db,
	models::{BreedEntry, ListingRow, ReferenceEntry, SavedSearchRow, UserProfile},
};

/// Filters and ordering evaluated by Postgres for one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPageQuery {
	pub constraints: IdConstraints,
	pub sort_desc: bool,
	pub limit: u32,
}

/// Single-label lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTable {
	Statuses,
	Species,
	Colors,
	Sexes,
}
impl ReferenceTable {
	fn select_sql(self) -> &'static str {
		match self {
			Self::Statuses =>
				"SELECT status_id AS id, label FROM listing_statuses ORDER BY status_id",
			Self::Species => "SELECT species_id AS id, label FROM species ORDER BY species_id",
			Self::Colors => "SELECT color_id AS id, label FROM colors ORDER BY color_id",
			Self::Sexes => "SELECT sex_id AS id, label FROM sexes ORDER BY sex_id",
		}
	}
}

pub async fn fetch_listing_page<'e, E>(executor: E, query: &ListingPageQuery) -> Result<Vec<ListingRow>>
where
	E: PgExecutor<'e>,
{
	let mut builder = QueryBuilder::<Postgres>::new(
		"\
SELECT
\tl.listing_id,
\tl.author_id,
\tl.headline,
\tl.description,
\tl.location_text,
\tl.event_date,
\tl.created_at,
\tl.status_id,
\tl.species_id,
\tl.breed_id,
\tl.sex_id,
\tl.is_active,
\tCOALESCE(
\t\t(SELECT array_agg(i.url ORDER BY i.position) FROM listing_images i WHERE i.listing_id = l.listing_id),
\t\t'{}'::text[]
\t) AS image_urls,
\tCOALESCE(
\t\t(SELECT array_agg(c.color_id ORDER BY c.color_id) FROM listing_colors c WHERE c.listing_id = l.listing_id),
\t\t'{}'::bigint[]
\t) AS color_ids
FROM listings l
WHERE TRUE",
	);

	push_constraint(&mut builder, "l.status_id", query.constraints.status);
	push_constraint(&mut builder, "l.species_id", query.constraints.species);
	push_constraint(&mut builder, "l.sex_id", query.constraints.sex);
	push_constraint(&mut builder, "l.breed_id", query.constraints.breed);

	builder.push(if query.sort_desc {
		" ORDER BY l.created_at DESC, l.listing_id ASC LIMIT "
	} else {
		" ORDER BY l.created_at ASC, l.listing_id ASC LIMIT "
	});
	builder.push_bind(i64::from(query.limit));

	let rows = builder.build_query_as::<ListingRow>().fetch_all(executor).await?;

	Ok(rows)
}

pub async fn fetch_favorite_ids<'e, E>(executor: E, viewer_id: Uuid) -> Result<Vec<Uuid>>
where
	E: PgExecutor<'e>,
{
	let ids = sqlx::query_scalar::<_, Uuid>("SELECT listing_id FROM favorites WHERE viewer_id = $1")
		.bind(viewer_id)
		.fetch_all(executor)
		.await?;

	Ok(ids)
}

pub async fn fetch_profiles<'e, E>(executor: E, user_ids: &[Uuid]) -> Result<Vec<UserProfile>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, UserProfile>(
		"\
SELECT user_id, display_name, avatar_url
FROM user_profiles
WHERE user_id = ANY($1)",
	)
	.bind(user_ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Flips the viewer's favorite mark on a listing and returns the state now stored.
pub async fn toggle_favorite(db: &Db, viewer_id: Uuid, listing_id: Uuid) -> Result<bool> {
	let mut tx = db.pool.begin().await?;
	let exists: Option<Uuid> =
		sqlx::query_scalar("SELECT listing_id FROM listings WHERE listing_id = $1")
			.bind(listing_id)
			.fetch_optional(&mut *tx)
			.await?;

	if exists.is_none() {
		return Err(Error::ListingNotFound { listing_id });
	}

	let removed: Option<Uuid> = sqlx::query_scalar(
		"\
DELETE FROM favorites
WHERE viewer_id = $1 AND listing_id = $2
RETURNING listing_id",
	)
	.bind(viewer_id)
	.bind(listing_id)
	.fetch_optional(&mut *tx)
	.await?;
	let favorite = removed.is_none();

	if favorite {
		sqlx::query(
			"\
INSERT INTO favorites (viewer_id, listing_id)
VALUES ($1, $2)
ON CONFLICT (viewer_id, listing_id) DO NOTHING",
		)
		.bind(viewer_id)
		.bind(listing_id)
		.execute(&mut *tx)
		.await?;
	}

	tx.commit().await?;

	Ok(favorite)
}

pub async fn list_saved_searches<'e, E>(executor: E, owner_id: Uuid) -> Result<Vec<SavedSearchRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, SavedSearchRow>(
		"\
SELECT saved_search_id, owner_id, name, filters, created_at
FROM saved_searches
WHERE owner_id = $1
ORDER BY created_at DESC, saved_search_id ASC",
	)
	.bind(owner_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn get_saved_search<'e, E>(
	executor: E,
	saved_search_id: Uuid,
	owner_id: Uuid,
) -> Result<Option<SavedSearchRow>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, SavedSearchRow>(
		"\
SELECT saved_search_id, owner_id, name, filters, created_at
FROM saved_searches
WHERE saved_search_id = $1 AND owner_id = $2",
	)
	.bind(saved_search_id)
	.bind(owner_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Inserts `row` unless its owner already holds `max_per_owner` saved searches.
pub async fn insert_saved_search(db: &Db, row: &SavedSearchRow, max_per_owner: u32) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	// Serializes concurrent inserts for one owner so the count check holds.
	sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::uuid::text))")
		.bind(row.owner_id)
		.execute(&mut *tx)
		.await?;

	let held: i64 = sqlx::query_scalar("SELECT count(*) FROM saved_searches WHERE owner_id = $1")
		.bind(row.owner_id)
		.fetch_one(&mut *tx)
		.await?;

	if held >= i64::from(max_per_owner) {
		return Err(Error::SavedSearchLimit { owner_id: row.owner_id, held, limit: max_per_owner });
	}

	sqlx::query(
		"\
INSERT INTO saved_searches (saved_search_id, owner_id, name, filters, created_at)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(row.saved_search_id)
	.bind(row.owner_id)
	.bind(row.name.as_str())
	.bind(&row.filters)
	.bind(row.created_at)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

/// Returns whether a row was removed.
pub async fn delete_saved_search<'e, E>(
	executor: E,
	saved_search_id: Uuid,
	owner_id: Uuid,
) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result =
		sqlx::query("DELETE FROM saved_searches WHERE saved_search_id = $1 AND owner_id = $2")
			.bind(saved_search_id)
			.bind(owner_id)
			.execute(executor)
			.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn list_reference_entries<'e, E>(
	executor: E,
	table: ReferenceTable,
) -> Result<Vec<ReferenceEntry>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ReferenceEntry>(table.select_sql()).fetch_all(executor).await?;

	Ok(rows)
}

pub async fn list_breeds<'e, E>(executor: E) -> Result<Vec<BreedEntry>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, BreedEntry>(
		"SELECT breed_id, species_id, label FROM breeds ORDER BY species_id, label, breed_id",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

fn push_constraint(builder: &mut QueryBuilder<'_, Postgres>, column: &str, constraint: Constraint<i64>) {
	match constraint {
		Constraint::Any => {},
		Constraint::Unspecified => {
			builder.push(format!(" AND {column} IS NULL"));
		},
		Constraint::Value(id) => {
			builder.push(format!(" AND {column} = "));
			builder.push_bind(id);
		},
	}
}
