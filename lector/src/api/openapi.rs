use axum::Json;
use utoipa::OpenApi;

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lector API",
        description = "OCR over HTTP: recognized text or bounding boxes for a base64-encoded image.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::get_text,
        handlers::ocr::get_bboxes,
    ),
    components(schemas(
        response::ApiError,
        dto::GetTextRequest,
        dto::GetTextResponse,
        dto::GetBboxesRequest,
        dto::GetBboxesResponse,
        dto::HealthData,
        dto::EngineStatus,
        crate::ocr::BoundingBox,
        crate::ocr::Granularity,
        crate::ocr::SessionState,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "ocr", description = "Text and bounding-box recognition"),
    ),
)]
pub struct ApiDoc;

/// `GET /api/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
