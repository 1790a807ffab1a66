use std::{
	collections::{BTreeMap, HashMap, HashSet},
	sync::Arc,
};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use time::macros::datetime;
use tower::util::ServiceExt;
use uuid::Uuid;

use pawfind_api::{routes, state::AppState};
use pawfind_config::{Config, Discovery, Postgres, Reference, Service, Storage};
use pawfind_domain::ListingRecord;
use pawfind_service::{
	BoxFuture, Error, FetchError, FetchPlan, MemoryRecordStore, PawfindService, ProfileRecord,
	RecordStore, ReferenceData, ReferenceItem, Result, StoredSearch,
};

const OWNER: &str = "00000000-0000-0000-0000-000000000384";

struct UnavailableStore;
impl UnavailableStore {
	fn down() -> FetchError {
		FetchError::Unavailable { message: "connection refused".to_string() }
	}
}
impl RecordStore for UnavailableStore {
	fn fetch_page<'a>(
		&'a self,
		_plan: &'a FetchPlan,
	) -> BoxFuture<'a, Result<Vec<ListingRecord>, FetchError>> {
		Box::pin(async { Err(Self::down()) })
	}

	fn fetch_favorite_ids<'a>(
		&'a self,
		_viewer_id: Uuid,
	) -> BoxFuture<'a, Result<HashSet<Uuid>, FetchError>> {
		Box::pin(async { Err(Self::down()) })
	}

	fn fetch_profiles<'a>(
		&'a self,
		_author_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<HashMap<Uuid, ProfileRecord>, FetchError>> {
		Box::pin(async { Err(Self::down()) })
	}

	fn fetch_reference_data<'a>(&'a self) -> BoxFuture<'a, Result<ReferenceData, FetchError>> {
		Box::pin(async { Err(Self::down()) })
	}

	fn toggle_favorite<'a>(
		&'a self,
		_viewer_id: Uuid,
		_listing_id: Uuid,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async { Err(Error::Fetch(Self::down())) })
	}

	fn list_saved_searches<'a>(
		&'a self,
		_owner_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<StoredSearch>, FetchError>> {
		Box::pin(async { Err(Self::down()) })
	}

	fn get_saved_search<'a>(
		&'a self,
		_saved_search_id: Uuid,
		_owner_id: Uuid,
	) -> BoxFuture<'a, Result<Option<StoredSearch>, FetchError>> {
		Box::pin(async { Err(Self::down()) })
	}

	fn create_saved_search<'a>(
		&'a self,
		_search: &'a StoredSearch,
		_max_per_owner: u32,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async { Err(Error::Fetch(Self::down())) })
	}

	fn delete_saved_search<'a>(
		&'a self,
		_saved_search_id: Uuid,
		_owner_id: Uuid,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async { Err(Error::Fetch(Self::down())) })
	}
}

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres { dsn: "postgres://unused".to_string(), pool_max_conns: 1 },
		},
		discovery: Discovery::default(),
		saved_search: Default::default(),
		reference: Reference::default(),
	}
}

fn listing(id: u128, headline: &str, colors: &[i64]) -> ListingRecord {
	ListingRecord {
		id: Uuid::from_u128(id),
		headline: headline.to_string(),
		description: String::new(),
		location_text: "Leipzig".to_string(),
		event_date: None,
		created_at: datetime!(2024-04-01 00:00 UTC) + time::Duration::days(id as i64),
		status_id: 1,
		species_id: 1,
		breed_id: None,
		sex_id: None,
		image_urls: vec![format!("https://img.example/{id}.jpg")],
		color_ids: colors.iter().copied().collect(),
		author_id: Uuid::from_u128(10),
		is_active: true,
	}
}

fn memory_state() -> AppState {
	let store = MemoryRecordStore::with_listings(vec![
		listing(1, "Schwarzer Kater", &[1]),
		listing(2, "Brauner Hund", &[3]),
		listing(3, "Kater mit Halsband", &[2]),
	]);

	store.insert_profile(
		Uuid::from_u128(10),
		ProfileRecord { display_name: Some("Jana".to_string()), avatar_url: None },
	);
	store.set_reference_data(ReferenceData {
		statuses: vec![ReferenceItem { id: 1, label: "lost".to_string() }],
		species: vec![ReferenceItem { id: 1, label: "cat".to_string() }],
		breeds: BTreeMap::new(),
		colors: vec![ReferenceItem { id: 1, label: "black".to_string() }],
		sexes: Vec::new(),
	});

	AppState::from_service(PawfindService::new(test_config(), Arc::new(store)))
}

fn unavailable_state() -> AppState {
	AppState::from_service(PawfindService::new(test_config(), Arc::new(UnavailableStore)))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match body {
		Some(body) => builder
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.expect("Failed to build request."),
		None => builder.body(Body::empty()).expect("Failed to build request."),
	};
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Response body is not JSON.")
	};

	(status, json)
}

fn item_headlines(body: &Value) -> Vec<String> {
	body["items"]
		.as_array()
		.expect("items must be an array")
		.iter()
		.map(|item| item["headline"].as_str().unwrap_or_default().to_string())
		.collect()
}

#[tokio::test]
async fn health_is_ok() {
	let (status, _) = send(routes::router(memory_state()), "GET", "/health", None).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn discover_filters_ranks_and_enriches() {
	let (status, body) = send(
		routes::router(memory_state()),
		"POST",
		"/v1/listings/discover",
		Some(json!({
			"criteria": { "query": "kater", "colors": "1,2", "sort": "created_at_asc" },
		})),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(item_headlines(&body), vec!["Schwarzer Kater", "Kater mit Halsband"]);
	assert_eq!(body["stale"], json!(false));
	assert_eq!(body["impact"]["fetched"], json!(3));
	assert_eq!(body["impact"]["after_search"], json!(2));
	assert_eq!(body["items"][0]["author"]["display_name"], json!("Jana"));
	assert_eq!(body["items"][0]["favorite"], json!(false));
}

#[tokio::test]
async fn discover_fails_closed_when_store_is_down() {
	let (status, body) =
		send(routes::router(unavailable_state()), "POST", "/v1/listings/discover", Some(json!({})))
			.await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["error_code"], json!("record_store_unavailable"));
	assert_eq!(body["fields"], Value::Null);
	assert!(body.get("items").is_none());
}

#[tokio::test]
async fn favorite_toggle_requires_viewer_and_reflects_state() {
	let app = routes::router(memory_state());
	let listing_id = Uuid::from_u128(2).to_string();
	let (status, body) = send(
		app.clone(),
		"POST",
		"/v1/favorites/toggle",
		Some(json!({ "listing_id": listing_id })),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], json!("invalid_request"));
	assert_eq!(body["fields"], json!(["viewer_id"]));

	let viewer = Uuid::from_u128(900).to_string();
	let (status, body) = send(
		app.clone(),
		"POST",
		"/v1/favorites/toggle",
		Some(json!({ "viewer_id": viewer, "listing_id": listing_id })),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["favorite"], json!(true));

	let (_, body) = send(
		app,
		"POST",
		"/v1/listings/discover",
		Some(json!({ "viewer_id": viewer, "criteria": { "sort": "created_at_asc" } })),
	)
	.await;
	let favorites =
		body["items"].as_array().expect("items").iter().map(|item| item["favorite"].clone());

	assert_eq!(favorites.collect::<Vec<_>>(), vec![json!(false), json!(true), json!(false)]);
}

#[tokio::test]
async fn favorite_toggle_on_missing_listing_is_not_found() {
	let (status, body) = send(
		routes::router(memory_state()),
		"POST",
		"/v1/favorites/toggle",
		Some(json!({
			"viewer_id": Uuid::from_u128(900).to_string(),
			"listing_id": Uuid::from_u128(404).to_string(),
		})),
	)
	.await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error_code"], json!("not_found"));
}

#[tokio::test]
async fn saved_search_lifecycle() {
	let app = routes::router(memory_state());
	let (status, created) = send(
		app.clone(),
		"POST",
		"/v1/saved_searches",
		Some(json!({
			"owner_id": OWNER,
			"name": "  Kater  ",
			"criteria": { "query": "kater", "species": 1 },
		})),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(created["name"], json!("Kater"));

	let id = created["id"].as_str().expect("id").to_string();
	let (status, listed) =
		send(app.clone(), "GET", &format!("/v1/saved_searches?owner_id={OWNER}"), None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(listed["items"].as_array().map(Vec::len), Some(1));

	let (status, replayed) = send(
		app.clone(),
		"POST",
		&format!("/v1/saved_searches/{id}/replay"),
		Some(json!({ "owner_id": OWNER })),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(item_headlines(&replayed), vec!["Kater mit Halsband", "Schwarzer Kater"]);

	let stranger = Uuid::from_u128(1).to_string();
	let (status, _) =
		send(app.clone(), "GET", &format!("/v1/saved_searches/{id}?owner_id={stranger}"), None)
			.await;

	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) =
		send(app.clone(), "DELETE", &format!("/v1/saved_searches/{id}?owner_id={OWNER}"), None)
			.await;

	assert_eq!(status, StatusCode::NO_CONTENT);

	let (status, _) =
		send(app, "GET", &format!("/v1/saved_searches/{id}?owner_id={OWNER}"), None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_saved_search_name_is_rejected() {
	let (status, body) = send(
		routes::router(memory_state()),
		"POST",
		"/v1/saved_searches",
		Some(json!({ "owner_id": OWNER, "name": "   " })),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], json!("invalid_request"));
	assert_eq!(body["fields"], json!(["name"]));
}

#[tokio::test]
async fn reference_data_is_served_and_invalidated() {
	let state = memory_state();
	let (status, body) = send(routes::router(state.clone()), "GET", "/v1/reference", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["colors"][0]["label"], json!("black"));
	assert!(state.service.references.is_loaded().await);

	let (status, _) = send(
		routes::admin_router(state.clone()),
		"POST",
		"/v1/admin/reference/invalidate",
		None,
	)
	.await;

	assert_eq!(status, StatusCode::NO_CONTENT);
	assert!(!state.service.references.is_loaded().await);
}

#[tokio::test]
async fn reference_failure_maps_to_service_unavailable() {
	let (status, body) =
		send(routes::router(unavailable_state()), "GET", "/v1/reference", None).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["error_code"], json!("record_store_unavailable"));
}
