use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::catalog::Satellite;
use crate::session::Snapshot;
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub term: String,
}

#[utoipa::path(
    get,
    path = "/api/state",
    responses(
        (status = 200, description = "Current session state", body = Snapshot)
    ),
    tag = "session"
)]
pub async fn state(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.session.snapshot())
}

/// Updates the search term; the catalog is queried once typing pauses.
#[utoipa::path(
    post,
    path = "/api/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Term accepted, search scheduled", body = Snapshot)
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<Snapshot> {
    state.session.set_search_term(&request.term);
    Json(state.session.snapshot())
}

#[utoipa::path(
    post,
    path = "/api/search/now",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search finished", body = Snapshot)
    ),
    tag = "search"
)]
pub async fn search_now(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<Snapshot> {
    state.session.submit_search(&request.term).await;
    Json(state.session.snapshot())
}

#[utoipa::path(
    get,
    path = "/api/recommended",
    responses(
        (status = 200, description = "Recommended satellites", body = Vec<Satellite>)
    ),
    tag = "search"
)]
pub async fn recommended(State(state): State<AppState>) -> Json<Vec<Satellite>> {
    Json(state.config.catalog.recommended.clone())
}
