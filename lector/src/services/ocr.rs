use tracing::{debug, error};

use crate::config::OcrConfig;
use crate::error::{LectorError, Result};
use crate::ocr::{
    payload, project_boxes, project_text, validation, BoundingBox, Granularity, ImageLimits,
    RecognitionResult, SessionPool,
};

/// Client-facing message for any payload that is not a usable image.
pub const INVALID_BASE64_IMAGE: &str = "Invalid base64_image.";

/// Decode → validate → recognize → project, shared by both OCR endpoints.
#[derive(Clone)]
pub struct OcrService {
    sessions: SessionPool,
    limits: ImageLimits,
}

impl OcrService {
    pub fn new(sessions: SessionPool, config: &OcrConfig) -> Self {
        Self {
            sessions,
            limits: ImageLimits::from(config),
        }
    }

    pub fn sessions(&self) -> &SessionPool {
        &self.sessions
    }

    pub async fn extract_text(&self, base64_image: &str) -> Result<String> {
        let result = self.recognize_payload(base64_image).await?;
        Ok(project_text(&result))
    }

    pub async fn extract_boxes(
        &self,
        base64_image: &str,
        granularity: Granularity,
    ) -> Result<Vec<BoundingBox>> {
        let result = self.recognize_payload(base64_image).await?;
        let boxes = project_boxes(&result, granularity);
        debug!(%granularity, count = boxes.len(), "Projected bounding boxes");
        Ok(boxes)
    }

    async fn recognize_payload(&self, base64_image: &str) -> Result<RecognitionResult> {
        let image = payload::decode(base64_image).map_err(|e| {
            debug!(error = %e, "Rejected base64 payload");
            LectorError::InvalidInput(INVALID_BASE64_IMAGE.to_string())
        })?;

        let byte_len = image.bytes.len();
        let (valid, bytes) = validation::validate(image.bytes, &self.limits).await;
        if !valid {
            debug!(media_type = %image.media_type, bytes = byte_len, "Payload is not a valid image");
            return Err(LectorError::InvalidImage(INVALID_BASE64_IMAGE.to_string()));
        }

        let result = self.sessions.recognize(bytes).await.map_err(|e| {
            error!(error = %e, "Recognition failed");
            e
        })?;

        if let Some(confidence) = result.mean_confidence() {
            debug!(confidence, words = result.words().count(), "Recognition complete");
        }
        Ok(result)
    }
}
