use std::sync::Arc;

use crate::config::Config;
use crate::ocr::SessionPool;
use crate::services::OcrService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ocr: OcrService,
}

impl AppState {
    /// The pool is expected to be initialized already; handlers never start it.
    pub fn new(config: Config, sessions: SessionPool) -> Self {
        let ocr = OcrService::new(sessions, &config.ocr);
        Self {
            config: Arc::new(config),
            ocr,
        }
    }
}
