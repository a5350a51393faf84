use utoipa::OpenApi;

use super::api::ai::ApiKeyRequest;
use super::api::error::ErrorResponse;
use super::api::globe::{DragRequest, ResizeRequest};
use super::api::search::SearchRequest;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::search::state,
        super::api::search::search,
        super::api::search::search_now,
        super::api::search::recommended,
        super::api::selection::select,
        super::api::selection::select_recommended,
        super::api::selection::orbit,
        super::api::ai::toggle,
        super::api::ai::save_key,
        super::api::ai::delete_key,
        super::api::globe::scene,
        super::api::globe::svg,
        super::api::globe::drag,
        super::api::globe::resize,
    ),
    components(
        schemas(
            SearchRequest,
            ApiKeyRequest,
            DragRequest,
            ResizeRequest,
            ErrorResponse,
            crate::session::Snapshot,
            crate::session::AiPanel,
            crate::catalog::Satellite,
            crate::catalog::TleData,
            crate::orbit::OrbitalData,
            crate::orbit::GeoPoint,
            crate::globe::Scene,
            crate::globe::SatelliteMarker,
            crate::globe::DragPhase,
            crate::globe::ViewMode,
        )
    ),
    info(
        title = "Satellite Globe API",
        description = "Search the TLE catalog, select a satellite and follow it on the globe",
        version = "0.1.0"
    ),
    tags(
        (name = "session", description = "Session state"),
        (name = "search", description = "Catalog search"),
        (name = "selection", description = "Selected satellite"),
        (name = "ai", description = "AI descriptions"),
        (name = "globe", description = "Globe view")
    )
)]
pub struct ApiDoc;
