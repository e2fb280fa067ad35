use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::Result;

use super::engine::{EngineFactory, RecognitionEngine};
use super::types::RecognitionResult;

/// Returns a preset result for every image, so the pipeline can be exercised
/// without Tesseract installed.
pub struct MockEngine {
    result: RecognitionResult,
    calls: Arc<AtomicUsize>,
}

impl RecognitionEngine for MockEngine {
    fn recognize(&mut self, _image: &[u8]) -> Result<RecognitionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

pub struct MockFactory {
    result: RecognitionResult,
    calls: Arc<AtomicUsize>,
}

impl MockFactory {
    pub fn new(result: RecognitionResult) -> Self {
        Self {
            result,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Recognitions run across every session this factory built.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EngineFactory for MockFactory {
    fn name(&self) -> &str {
        "mock"
    }

    fn create(&self) -> Result<Box<dyn RecognitionEngine>> {
        Ok(Box::new(MockEngine {
            result: self.result.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}
