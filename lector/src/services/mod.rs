mod ocr;

pub use ocr::{OcrService, INVALID_BASE64_IMAGE};
