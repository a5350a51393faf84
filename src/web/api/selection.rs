use axum::{extract::State, Json};

use crate::catalog::Satellite;
use crate::orbit::OrbitalData;
use crate::session::Snapshot;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[utoipa::path(
    post,
    path = "/api/select",
    request_body = Satellite,
    responses(
        (status = 200, description = "Selection changed, TLE loading", body = Snapshot)
    ),
    tag = "selection"
)]
pub async fn select(
    State(state): State<AppState>,
    Json(satellite): Json<Satellite>,
) -> Json<Snapshot> {
    state.session.select(satellite).await;
    Json(state.session.snapshot())
}

#[utoipa::path(
    post,
    path = "/api/select/recommended",
    request_body = Satellite,
    responses(
        (status = 200, description = "Recommended satellite selected", body = Snapshot),
        (status = 404, description = "Not in the recommended list", body = ErrorResponse)
    ),
    tag = "selection"
)]
pub async fn select_recommended(
    State(state): State<AppState>,
    Json(satellite): Json<Satellite>,
) -> ApiResult<Json<Snapshot>> {
    let known = state
        .config
        .catalog
        .recommended
        .iter()
        .any(|s| s.satellite_id == satellite.satellite_id);
    if !known {
        return Err(ApiError::NotFound("not_recommended"));
    }

    state.session.select_recommended(satellite).await;
    Ok(Json(state.session.snapshot()))
}

#[utoipa::path(
    get,
    path = "/api/orbit",
    responses(
        (status = 200, description = "Orbital parameters at the current time", body = OrbitalData),
        (status = 404, description = "No TLE loaded", body = ErrorResponse)
    ),
    tag = "selection"
)]
pub async fn orbit(State(state): State<AppState>) -> ApiResult<Json<OrbitalData>> {
    state
        .session
        .orbital_data()
        .map(Json)
        .ok_or(ApiError::NotFound("no_orbital_data"))
}
