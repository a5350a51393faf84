use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::globe::{Globe, LandOverlay};
use crate::orbit::system_clock;
use crate::session::Session;

use super::api::ai as ai_handlers;
use super::api::globe as globe_handlers;
use super::api::search as search_handlers;
use super::api::selection as selection_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;
use super::ui::handlers as ui_handlers;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let static_dir = state.config.web.static_dir.clone();

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        // Session and search
        .route("/api/state", get(search_handlers::state))
        .route("/api/search", post(search_handlers::search))
        .route("/api/search/now", post(search_handlers::search_now))
        .route("/api/recommended", get(search_handlers::recommended))
        // Selection
        .route("/api/select", post(selection_handlers::select))
        .route(
            "/api/select/recommended",
            post(selection_handlers::select_recommended),
        )
        .route("/api/orbit", get(selection_handlers::orbit))
        // AI
        .route("/api/ai/toggle", post(ai_handlers::toggle))
        .route(
            "/api/ai/key",
            axum::routing::put(ai_handlers::save_key).delete(ai_handlers::delete_key),
        )
        // Globe
        .route("/api/globe", get(globe_handlers::scene))
        .route("/api/globe.svg", get(globe_handlers::svg))
        .route("/api/globe/drag", post(globe_handlers::drag))
        .route("/api/globe/resize", post(globe_handlers::resize))
        // Static files
        .nest_service("/static", ServeDir::new(static_dir))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let land = match &config.globe.land_geojson {
        Some(path) => LandOverlay::from_file(path).unwrap_or_else(|e| {
            log::warn!("Failed to load land outlines from {}: {}", path.display(), e);
            LandOverlay::default()
        }),
        None => LandOverlay::default(),
    };

    let clock = system_clock();
    let globe = Globe::new(config.globe.clone(), land, clock.clone());
    let config = Arc::new(config);
    let session = Session::new(config.clone(), globe, clock).map_err(std::io::Error::other)?;
    session.start().await;

    let app = router(AppState {
        config,
        session: session.clone(),
    });

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let result = axum::serve(listener, app).await;
    session.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::Clock;
    use crate::test_support::{iss_epoch, spawn_server};
    use approx::assert_relative_eq;
    use serde_json::{json, Value};
    use std::time::Duration;

    struct TestApp {
        base: String,
        client: reqwest::Client,
        _dir: tempfile::TempDir,
    }

    /// Serves the app against a catalog that nobody listens on.
    async fn app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.catalog.base_url = "http://127.0.0.1:9/api/tle".to_string();
        config.catalog.timeout = Duration::from_millis(500);
        config.ai.credential_file = dir.path().join("gemini-api-key");
        config.ai.env_var = "SAT_GLOBE_SERVER_TEST_UNSET".to_string();
        config.web.static_dir = dir.path().to_path_buf();

        let clock: Clock = Arc::new(iss_epoch);
        let globe = Globe::new(config.globe.clone(), LandOverlay::default(), clock.clone());
        let config = Arc::new(config);
        let session = Session::new(config.clone(), globe, clock).unwrap();
        let base = spawn_server(router(AppState { config, session })).await;

        TestApp {
            base,
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn state_starts_empty() {
        let app = app().await;
        let state: Value = app
            .client
            .get(format!("{}/api/state", app.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(state["search_term"], "");
        assert_eq!(state["ai"]["status"], "no_api_key");
        assert_eq!(state["list_message"], "Enter at least 3 characters to search.");
    }

    #[tokio::test]
    async fn recommended_list_is_served() {
        let app = app().await;
        let list: Vec<Value> = app
            .client
            .get(format!("{}/api/recommended", app.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(list.len(), 8);
        assert_eq!(list[0]["satelliteId"], 25544);
    }

    #[tokio::test]
    async fn unknown_recommendation_is_rejected() {
        let app = app().await;
        let response = app
            .client
            .post(format!("{}/api/select/recommended", app.base))
            .json(&json!({"name": "MYSTERY", "satelliteId": 1}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "not_recommended");
    }

    #[tokio::test]
    async fn unreachable_catalog_reports_network_error() {
        let app = app().await;
        let state: Value = app
            .client
            .post(format!("{}/api/search/now", app.base))
            .json(&json!({"term": "starlink"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(state["search_term"], "starlink");
        assert!(state["error"].as_str().unwrap().starts_with("network error"));
        assert_eq!(state["satellites"], json!([]));
    }

    #[tokio::test]
    async fn key_lifecycle() {
        let app = app().await;
        let blank = app
            .client
            .put(format!("{}/api/ai/key", app.base))
            .json(&json!({"key": "  "}))
            .send()
            .await
            .unwrap();
        assert_eq!(blank.status(), reqwest::StatusCode::BAD_REQUEST);

        let state: Value = app
            .client
            .put(format!("{}/api/ai/key", app.base))
            .json(&json!({"key": "some-key"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(state["api_key_provided"], true);
        assert_eq!(state["ai"]["status"], "disabled");

        let state: Value = app
            .client
            .post(format!("{}/api/ai/toggle", app.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(state["ai_enabled"], true);

        let state: Value = app
            .client
            .delete(format!("{}/api/ai/key", app.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(state["api_key_provided"], false);
        assert_eq!(state["ai_enabled"], false);
    }

    #[tokio::test]
    async fn globe_drag_and_svg() {
        let app = app().await;
        let scene: Value = app
            .client
            .post(format!("{}/api/globe/resize", app.base))
            .json(&json!({"width": 330.0, "height": 330.0}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_relative_eq!(scene["scale"].as_f64().unwrap(), 150.0, epsilon = 1e-9);

        for (phase, dx) in [("start", 0.0), ("move", 10.0)] {
            app.client
                .post(format!("{}/api/globe/drag", app.base))
                .json(&json!({"phase": phase, "dx": dx, "dy": 0.0}))
                .send()
                .await
                .unwrap();
        }
        let scene: Value = app
            .client
            .get(format!("{}/api/globe", app.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(scene["mode"], "dragging");
        assert_relative_eq!(scene["rotation"][0].as_f64().unwrap(), -95.0, epsilon = 1e-9);

        let svg = app
            .client
            .get(format!("{}/api/globe.svg", app.base))
            .send()
            .await
            .unwrap();
        assert_eq!(svg.headers()["content-type"], "image/svg+xml");
        assert!(svg.text().await.unwrap().starts_with("<svg"));

        let bad = app
            .client
            .post(format!("{}/api/globe/resize", app.base))
            .json(&json!({"width": 0.0, "height": 100.0}))
            .send()
            .await
            .unwrap();
        assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_renders() {
        let app = app().await;
        let page = app
            .client
            .get(format!("{}/", app.base))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("ISS (ZARYA)"));
        assert!(page.contains("<svg"));
        // a stored key can be removed even when it failed to initialize
        assert!(page.contains(r#"<button id="delete-key">Delete</button>"#));
    }

    #[tokio::test]
    async fn openapi_lists_routes() {
        let app = app().await;
        let doc: Value = app
            .client
            .get(format!("{}/api-doc/openapi.json", app.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(doc["paths"]["/api/globe/drag"].is_object());
        assert!(doc["paths"]["/api/ai/key"]["put"].is_object());
    }
}
