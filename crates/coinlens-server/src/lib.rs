//! # Coinlens Server
//!
//! axum boundary for the coinlens aggregator: startup configuration, the
//! response envelope and the route table.

pub mod config;
pub mod envelope;
pub mod error;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use envelope::{ApiEnvelope, ApiError};
pub use error::ServerError;
pub use routes::router;
