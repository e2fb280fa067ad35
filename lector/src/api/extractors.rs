use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;

use crate::error::LectorError;

/// `axum::Json` whose rejections render as the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(LectorError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for LectorError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> LectorError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_invalid_field(&message) {
                LectorError::InvalidInput(format!("Invalid {field}."))
            } else {
                LectorError::InvalidInput(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            LectorError::InvalidInput(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => LectorError::InvalidInput(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(_) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            LectorError::PayloadTooLarge
        }
        JsonRejection::BytesRejection(_) => {
            LectorError::Internal("Failed to read request body".to_string())
        }
        _ => LectorError::InvalidInput(rejection.body_text()),
    }
}

/// Pull `base64_image` out of serde's "...: invalid type: ..." messages,
/// which axum prefixes with the JSON path of the offending field.
fn extract_invalid_field(message: &str) -> Option<&str> {
    ["base64_image", "bbox_type"]
        .into_iter()
        .find(|field| message.contains(&format!("{field}: ")))
}
