use std::sync::OnceLock;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use regex::Regex;

use crate::error::{LectorError, Result};

/// Standard alphabet; trailing `=` padding is optional on input.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn data_uri_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^data:([A-Za-z0-9+/-]+);base64,(.+)$").expect("data URI pattern is valid")
    })
}

/// Bytes pulled out of a `data:<media-type>;base64,<data>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Declared media type. Not trusted; kept for logging.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Decode a data URI into raw bytes. Never panics on malformed input.
pub fn decode(payload: &str) -> Result<DecodedImage> {
    let captures = data_uri_regex()
        .captures(payload)
        .ok_or_else(|| LectorError::InvalidInput("payload is not a base64 data URI".to_string()))?;

    let media_type = captures[1].to_string();
    let bytes = PAYLOAD_ENGINE
        .decode(&captures[2])
        .map_err(|e| LectorError::InvalidInput(format!("invalid base64 data: {e}")))?;

    Ok(DecodedImage { media_type, bytes })
}
