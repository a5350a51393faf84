use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::session::Snapshot;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiKeyRequest {
    pub key: String,
}

#[utoipa::path(
    post,
    path = "/api/ai/toggle",
    responses(
        (status = 200, description = "AI switch flipped (unchanged without a key)", body = Snapshot)
    ),
    tag = "ai"
)]
pub async fn toggle(State(state): State<AppState>) -> Json<Snapshot> {
    state.session.toggle_ai();
    Json(state.session.snapshot())
}

#[utoipa::path(
    put,
    path = "/api/ai/key",
    request_body = ApiKeyRequest,
    responses(
        (status = 200, description = "Key stored", body = Snapshot),
        (status = 400, description = "Blank key", body = ErrorResponse),
        (status = 500, description = "Key could not be written", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn save_key(
    State(state): State<AppState>,
    Json(request): Json<ApiKeyRequest>,
) -> ApiResult<Json<Snapshot>> {
    if !state.session.save_api_key(&request.key)? {
        return Err(ApiError::Validation("API key must not be empty".to_string()));
    }
    Ok(Json(state.session.snapshot()))
}

#[utoipa::path(
    delete,
    path = "/api/ai/key",
    responses(
        (status = 200, description = "Key removed and AI disabled", body = Snapshot),
        (status = 500, description = "Key could not be removed", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn delete_key(State(state): State<AppState>) -> ApiResult<Json<Snapshot>> {
    state.session.delete_api_key()?;
    Ok(Json(state.session.snapshot()))
}
