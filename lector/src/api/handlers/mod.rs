pub mod health;
pub mod ocr;
