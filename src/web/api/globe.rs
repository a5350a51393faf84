use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::globe::{DragPhase, Scene};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DragRequest {
    pub phase: DragPhase,
    /// Pointer movement in pixels since the previous event.
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResizeRequest {
    pub width: f64,
    pub height: f64,
}

#[utoipa::path(
    get,
    path = "/api/globe",
    responses(
        (status = 200, description = "Current globe scene", body = Scene)
    ),
    tag = "globe"
)]
pub async fn scene(State(state): State<AppState>) -> Json<Scene> {
    Json(state.session.globe().lock().await.scene())
}

#[utoipa::path(
    get,
    path = "/api/globe.svg",
    responses(
        (status = 200, description = "Current globe scene as SVG", content_type = "image/svg+xml", body = String)
    ),
    tag = "globe"
)]
pub async fn svg(State(state): State<AppState>) -> impl IntoResponse {
    let svg = state.session.globe().lock().await.render_svg();
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

#[utoipa::path(
    post,
    path = "/api/globe/drag",
    request_body = DragRequest,
    responses(
        (status = 200, description = "Scene after the drag event", body = Scene)
    ),
    tag = "globe"
)]
pub async fn drag(
    State(state): State<AppState>,
    Json(request): Json<DragRequest>,
) -> Json<Scene> {
    let globe = state.session.globe().lock().await;
    globe.drag(request.phase, request.dx, request.dy);
    Json(globe.scene())
}

#[utoipa::path(
    post,
    path = "/api/globe/resize",
    request_body = ResizeRequest,
    responses(
        (status = 200, description = "Scene after resizing", body = Scene),
        (status = 400, description = "Non-positive size", body = ErrorResponse)
    ),
    tag = "globe"
)]
pub async fn resize(
    State(state): State<AppState>,
    Json(request): Json<ResizeRequest>,
) -> ApiResult<Json<Scene>> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(request.width) || !valid(request.height) {
        return Err(ApiError::Validation(
            "width and height must be positive".to_string(),
        ));
    }

    let globe = state.session.globe().lock().await;
    globe.resize(request.width, request.height);
    Ok(Json(globe.scene()))
}
