//! Insight Server - HTTP gateway for the analysis pipeline
//!
//! Provides:
//! - `GET /health` and `GET /auth-status`
//! - `POST /analyze` guarded by an optional `X-API-Key`
//! - Configuration from flags and `ECOM_AGENT_*` environment variables
//! - Mapping of pipeline errors to 401/400/500 with a `{"detail"}` body

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod routes;

pub use config::{Cli, CorsPolicy, ServerConfig};
pub use error::{ApiError, ErrorResponse};
pub use routes::{router, AppState, AuthStatusResponse, HealthResponse};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
