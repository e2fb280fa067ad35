use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.body_limit_bytes;

    let api = Router::new()
        .route("/get-text", post(handlers::ocr::get_text))
        .route("/get-bboxes", post(handlers::ocr::get_bboxes))
        .route("/health", get(handlers::health::health_check))
        .route("/openapi.json", get(openapi::openapi_json));

    Router::new()
        .nest("/api", api)
        // Enforced by the body extractor, so oversized requests still get
        // the JSON envelope.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
