//! OCR (Optical Character Recognition) Module
//!
//! Everything between an untrusted base64 payload and the response shapes
//! the API returns.
//!
//! # Pipeline
//!
//! - `payload::decode` turns a `data:<type>;base64,<data>` URI into bytes
//! - `validation::validate` checks the bytes fully decode as a raster image
//! - `SessionPool` runs the bytes through a pooled, serialized engine session
//! - `projection` flattens the page → block → paragraph → line → word tree
//!   into text or bounding boxes
//!
//! # Engines
//!
//! `RecognitionEngine` / `EngineFactory` are the seam to the recognizer.
//! `TesseractFactory` builds leptess-backed sessions; `MockFactory` returns a
//! preset result for tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! let pool = SessionPool::from_config(Arc::new(TesseractFactory::new(&config.ocr)), &config.ocr);
//! pool.initialize().await?;
//! let image = payload::decode(&body.base64_image)?;
//! let result = pool.recognize(image.bytes).await?;
//! let words = project_boxes(&result, Granularity::Word);
//! ```

mod engine;
mod mock;
pub mod payload;
mod projection;
mod session;
mod tsv;
mod types;
pub mod validation;

pub use engine::{EngineFactory, RecognitionEngine, TesseractEngine, TesseractFactory};
pub use mock::{MockEngine, MockFactory};
pub use payload::DecodedImage;
pub use projection::{project_boxes, project_text};
pub use session::{PoolSettings, SessionPool, SessionState};
pub use tsv::parse_layout;
pub use types::{
    Block, BoundingBox, Granularity, Line, Page, Paragraph, RecognitionResult, Region,
    UnknownGranularity, Word,
};
pub use validation::ImageLimits;
