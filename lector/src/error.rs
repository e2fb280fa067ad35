use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiResponse;

#[derive(Error, Debug)]
pub enum LectorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("OCR engine error: {0}")]
    Engine(String),

    #[error("OCR operation timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("OCR engine overloaded: all {capacity} request slots are taken")]
    Overloaded { capacity: usize },

    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl LectorError {
    pub fn status(&self) -> StatusCode {
        match self {
            LectorError::InvalidInput(_) | LectorError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            LectorError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            // An overloaded or stopped pool is an engine failure to the client.
            LectorError::Engine(_)
            | LectorError::Timeout { .. }
            | LectorError::Overloaded { .. }
            | LectorError::Unavailable(_)
            | LectorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LectorError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, LectorError>;
