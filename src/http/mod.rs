//! HTTP layer
//!
//! Axum router with query-string `GET` endpoints, CORS, request tracing,
//! graceful shutdown and classified JSON errors.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{ServerConfig, ServerError, build_router, run_server};
pub use state::AppState;
