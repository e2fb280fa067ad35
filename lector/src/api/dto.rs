//! Request and response bodies for the OCR endpoints.
//!
//! Request fields are optional so that a missing field reaches the handler
//! and gets the same message as an empty one.

use serde::{Deserialize, Serialize};

use crate::ocr::{BoundingBox, SessionState};

/// Body of `POST /api/get-text`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct GetTextRequest {
    /// Data URI of the form `data:<media-type>;base64,<payload>`.
    #[serde(default)]
    pub base64_image: Option<String>,
}

/// Body of `POST /api/get-bboxes`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct GetBboxesRequest {
    #[serde(default)]
    pub base64_image: Option<String>,
    /// One of `word`, `line`, `paragraph`, `block`, `page`.
    #[serde(default)]
    pub bbox_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GetTextResponse {
    /// Full recognized text, exactly as the engine produced it.
    pub text: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct GetBboxesResponse {
    /// Boxes in document reading order.
    pub bboxes: Vec<BoundingBox>,
}

/// Health data returned inside the envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub engine: EngineStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EngineStatus {
    pub name: String,
    pub state: SessionState,
    /// Sessions in the pool.
    pub sessions: usize,
    /// Requests that may be running or queued at once.
    pub capacity: usize,
    pub in_flight: usize,
}

/// Treat `None` and `""` alike; an empty field is as good as absent.
pub(crate) fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
