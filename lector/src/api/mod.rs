//! HTTP surface: router, handlers and the JSON envelope.

pub mod dto;
mod extractors;
pub mod handlers;
pub mod openapi;
mod response;
mod routes;
mod state;

pub use extractors::AppJson;
pub use response::{ApiError, ApiResponse};
pub use routes::create_router;
pub use state::AppState;
