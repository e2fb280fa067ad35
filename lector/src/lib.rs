//! Lector: OCR over HTTP.
//!
//! A base64 image comes in, and either the recognized text or the bounding
//! boxes at one level of the layout hierarchy go out. Recognition runs on a
//! pool of Tesseract sessions; see [`ocr::SessionPool`].

pub mod api;
pub mod config;
pub mod error;
pub mod ocr;
pub mod services;
