//! OCR handlers.
//!
//! Field checks happen here, before any decoding or engine work. Everything
//! past that point is [`OcrService`](crate::services::OcrService)'s job.

use axum::extract::State;

use crate::api::dto::{non_empty, GetBboxesRequest, GetBboxesResponse, GetTextRequest, GetTextResponse};
use crate::api::extractors::AppJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::ocr::Granularity;
use crate::services::INVALID_BASE64_IMAGE;

pub const INVALID_IMAGE_OR_BBOX_TYPE: &str = "Invalid base64_image or bbox_type.";
pub const INVALID_BBOX_TYPE: &str = "Invalid bbox_type.";

/// `POST /api/get-text`
#[utoipa::path(
    post,
    path = "/api/get-text",
    tag = "ocr",
    operation_id = "ocr.getText",
    request_body = GetTextRequest,
    responses(
        (status = 200, description = "Recognized text", body = GetTextResponse),
        (status = 400, description = "Missing or invalid image", body = ApiError),
        (status = 500, description = "Recognition failed, timed out, or the engine is overloaded or shut down", body = ApiError),
    )
)]
pub async fn get_text(
    State(state): State<AppState>,
    AppJson(req): AppJson<GetTextRequest>,
) -> ApiResponse<GetTextResponse> {
    let Some(base64_image) = non_empty(req.base64_image) else {
        return ApiResponse::bad_request(INVALID_BASE64_IMAGE);
    };

    match state.ocr.extract_text(&base64_image).await {
        Ok(text) => ApiResponse::success(GetTextResponse { text }),
        Err(e) => e.into(),
    }
}

/// `POST /api/get-bboxes`
///
/// `bbox_type` is checked before the image is decoded, so an unknown type
/// never costs a recognition.
#[utoipa::path(
    post,
    path = "/api/get-bboxes",
    tag = "ocr",
    operation_id = "ocr.getBboxes",
    request_body = GetBboxesRequest,
    responses(
        (status = 200, description = "Bounding boxes at the requested level", body = GetBboxesResponse),
        (status = 400, description = "Missing fields, unknown bbox_type or invalid image", body = ApiError),
        (status = 500, description = "Recognition failed, timed out, or the engine is overloaded or shut down", body = ApiError),
    )
)]
pub async fn get_bboxes(
    State(state): State<AppState>,
    AppJson(req): AppJson<GetBboxesRequest>,
) -> ApiResponse<GetBboxesResponse> {
    let (Some(base64_image), Some(bbox_type)) =
        (non_empty(req.base64_image), non_empty(req.bbox_type))
    else {
        return ApiResponse::bad_request(INVALID_IMAGE_OR_BBOX_TYPE);
    };

    let granularity: Granularity = match bbox_type.parse() {
        Ok(g) => g,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bbox_type");
            return ApiResponse::bad_request(INVALID_BBOX_TYPE);
        }
    };

    match state.ocr.extract_boxes(&base64_image, granularity).await {
        Ok(bboxes) => ApiResponse::success(GetBboxesResponse { bboxes }),
        Err(e) => e.into(),
    }
}
