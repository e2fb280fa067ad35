use std::io::Cursor;

use image::{ImageReader, Limits};
use tracing::warn;

use crate::config::OcrConfig;

/// Decoder limits applied while validating untrusted images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_dimension: u32,
    pub max_alloc: u64,
}

impl From<&OcrConfig> for ImageLimits {
    fn from(config: &OcrConfig) -> Self {
        Self {
            max_dimension: config.max_image_dimension,
            max_alloc: config.max_decode_alloc,
        }
    }
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self::from(&OcrConfig::default())
    }
}

impl ImageLimits {
    fn to_decoder_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);
        limits.max_alloc = Some(self.max_alloc);
        limits
    }
}

/// Fully decode `bytes` and report whether they form a readable raster image.
///
/// Format is sniffed from the content, so any format the `image` crate
/// understands (PNG, JPEG, GIF, WebP, BMP, TIFF, ...) is accepted. Every
/// failure, including a panicking decoder, is logged and reported as `false`.
///
/// The buffer is moved to the decoding thread and handed back, so the caller
/// can pass the same allocation on to recognition. It comes back empty only
/// if the decoder panicked.
pub async fn validate(bytes: Vec<u8>, limits: &ImageLimits) -> (bool, Vec<u8>) {
    let limits = *limits;

    let checked = tokio::task::spawn_blocking(move || {
        let outcome = decode_fully(&bytes, limits);
        (outcome, bytes)
    })
    .await;

    match checked {
        Ok((Ok(()), bytes)) => (true, bytes),
        Ok((Err(reason), bytes)) => {
            warn!(reason = %reason, "Rejected image payload");
            (false, bytes)
        }
        Err(e) => {
            warn!(error = %e, "Image validation task failed");
            (false, Vec::new())
        }
    }
}

fn decode_fully(bytes: &[u8], limits: ImageLimits) -> Result<(), String> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| format!("failed to read image: {e}"))?;

    if reader.format().is_none() {
        return Err("unrecognized image format".to_string());
    }

    reader.limits(limits.to_decoder_limits());
    reader
        .decode()
        .map(|_| ())
        .map_err(|e| format!("failed to decode image: {e}"))
}
