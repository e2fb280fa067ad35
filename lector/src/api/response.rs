//! # API Response Envelope & Error Contract
//!
//! Every endpoint returns an [`ApiResponse<T>`]:
//!
//! ```json
//! { "success": true,  "result": { ... } }
//! { "success": false, "error": { "message": "..." } }
//! ```
//!
//! The HTTP status is carried alongside the body but never serialized.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::LectorError;

/// Error payload within the envelope.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Human-readable description safe to show to clients.
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success response with a result (HTTP 200).
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(ApiError {
                message: message.into(),
            }),
            status,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => {
                let body = serde_json::json!({
                    "success": false,
                    "error": { "message": "An internal error occurred" }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<LectorError> for ApiResponse<T> {
    /// Client errors keep their message. Engine failures carry the engine's
    /// diagnostic; anything else is logged and replaced by a generic message.
    fn from(err: LectorError) -> Self {
        let status = err.status();
        match err {
            LectorError::InvalidInput(msg) | LectorError::InvalidImage(msg) => {
                ApiResponse::error(status, msg)
            }

            LectorError::PayloadTooLarge => ApiResponse::error(status, err.to_string()),

            ref engine @ (LectorError::Engine(_)
            | LectorError::Timeout { .. }
            | LectorError::Overloaded { .. }
            | LectorError::Unavailable(_)) => ApiResponse::error(status, engine.to_string()),

            ref internal @ LectorError::Internal(_) => {
                tracing::error!(error = %internal, "Internal error mapped to API response");
                ApiResponse::error(status, "An internal error occurred")
            }
        }
    }
}
