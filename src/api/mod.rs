// src/api/mod.rs
// HTTP API: router, handlers and error mapping

pub mod error;
pub mod handlers;
pub mod router;

pub use error::{ApiError, ApiResult};
pub use router::create_router;
