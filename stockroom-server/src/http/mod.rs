//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - Enveloped JSON responses for success and failure

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use envelope::{Envelope, ErrorInfo, Status};
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
