use leptess::LepTess;
use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::error::{LectorError, Result};

use super::tsv::parse_layout;
use super::types::RecognitionResult;

/// One stateful recognition session. Implementations are not reentrant;
/// the session pool guarantees exclusive access for the duration of a call.
pub trait RecognitionEngine: Send {
    /// Recognize `image` (encoded PNG/JPEG/...) and return text plus layout.
    fn recognize(&mut self, image: &[u8]) -> Result<RecognitionResult>;
}

/// Builds engine sessions. Used at startup and to replace a session whose
/// state can no longer be trusted.
pub trait EngineFactory: Send + Sync {
    fn name(&self) -> &str;

    fn create(&self) -> Result<Box<dyn RecognitionEngine>>;
}

/// Tesseract via leptess.
pub struct TesseractEngine {
    tess: LepTess,
}

impl TesseractEngine {
    pub fn new(data_path: Option<&str>, languages: &str) -> Result<Self> {
        let tess = LepTess::new(data_path, languages).map_err(|e| {
            LectorError::Engine(format!(
                "Failed to initialize Tesseract (languages={languages}): {e}"
            ))
        })?;
        Ok(Self { tess })
    }
}

impl RecognitionEngine for TesseractEngine {
    fn recognize(&mut self, image: &[u8]) -> Result<RecognitionResult> {
        self.tess
            .set_image_from_mem(image)
            .map_err(|e| LectorError::Engine(format!("Failed to set image: {e}")))?;

        let text = self
            .tess
            .get_utf8_text()
            .map_err(|e| LectorError::Engine(format!("Failed to extract text: {e}")))?;

        // Layout comes from the same recognition pass as the text.
        let tsv = self
            .tess
            .get_tsv_text(0)
            .map_err(|e| LectorError::Engine(format!("Failed to extract layout: {e}")))?;
        let pages = parse_layout(&tsv)?;

        debug!(
            chars = text.len(),
            pages = pages.len(),
            "Tesseract recognition finished"
        );

        Ok(RecognitionResult { text, pages })
    }
}

pub struct TesseractFactory {
    data_path: Option<String>,
    languages: String,
}

impl TesseractFactory {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            data_path: config.data_path.clone(),
            languages: config.languages.clone(),
        }
    }
}

impl EngineFactory for TesseractFactory {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn create(&self) -> Result<Box<dyn RecognitionEngine>> {
        let engine = TesseractEngine::new(self.data_path.as_deref(), &self.languages)?;
        info!(languages = %self.languages, "Tesseract session created");
        Ok(Box::new(engine))
    }
}
