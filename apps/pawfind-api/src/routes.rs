use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawfind_service::{
	CreateSavedSearchRequest, DiscoverRequest, DiscoverResponse, Error, ReferenceData, SavedSearch,
	ToggleFavoriteRequest, ToggleFavoriteResponse,
};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct OwnerQuery {
	owner_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ReplayRequest {
	owner_id: Uuid,
}

#[derive(Debug, Serialize)]
struct SavedSearchList {
	items: Vec<SavedSearch>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { field, message } => json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				message,
				Some(vec![field.to_string()]),
			),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "conflict", message, None),
			Error::Fetch(err) => json_error(
				StatusCode::SERVICE_UNAVAILABLE,
				"record_store_unavailable",
				err.to_string(),
				None,
			),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"Storage operation failed.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/listings/discover", post(discover))
		.route("/v1/favorites/toggle", post(toggle_favorite))
		.route("/v1/saved_searches", get(list_saved_searches).post(create_saved_search))
		.route("/v1/saved_searches/{id}", get(get_saved_search).delete(delete_saved_search))
		.route("/v1/saved_searches/{id}/replay", post(replay_saved_search))
		.route("/v1/reference", get(reference))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/reference/invalidate", post(invalidate_reference))
		.with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn discover(
	State(state): State<AppState>,
	Json(payload): Json<DiscoverRequest>,
) -> Result<Json<DiscoverResponse>, ApiError> {
	let response = state.service.discover(payload).await?;

	Ok(Json(response))
}

async fn toggle_favorite(
	State(state): State<AppState>,
	Json(payload): Json<ToggleFavoriteRequest>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
	let response = state.service.toggle_favorite(payload).await?;

	Ok(Json(response))
}

async fn list_saved_searches(
	State(state): State<AppState>,
	Query(owner): Query<OwnerQuery>,
) -> Result<Json<SavedSearchList>, ApiError> {
	let items = state.service.list_saved_searches(owner.owner_id).await?;

	Ok(Json(SavedSearchList { items }))
}

async fn create_saved_search(
	State(state): State<AppState>,
	Json(payload): Json<CreateSavedSearchRequest>,
) -> Result<(StatusCode, Json<SavedSearch>), ApiError> {
	let saved = state.service.create_saved_search(payload).await?;

	Ok((StatusCode::CREATED, Json(saved)))
}

async fn get_saved_search(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Query(owner): Query<OwnerQuery>,
) -> Result<Json<SavedSearch>, ApiError> {
	let saved = state.service.get_saved_search(id, owner.owner_id).await?;

	Ok(Json(saved))
}

async fn delete_saved_search(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Query(owner): Query<OwnerQuery>,
) -> Result<StatusCode, ApiError> {
	state.service.delete_saved_search(id, owner.owner_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn replay_saved_search(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<ReplayRequest>,
) -> Result<Json<DiscoverResponse>, ApiError> {
	let response = state.service.replay_saved_search(id, payload.owner_id).await?;

	Ok(Json(response))
}

async fn reference(State(state): State<AppState>) -> Result<Json<ReferenceData>, ApiError> {
	let data = state.service.reference_data().await?;

	Ok(Json(ReferenceData::clone(&data)))
}

async fn invalidate_reference(State(state): State<AppState>) -> StatusCode {
	state.service.invalidate_reference_data().await;

	StatusCode::NO_CONTENT
}
