use std::net::SocketAddr;

use thiserror::Error;

use crate::config::ConfigError;

/// Startup and serve failures, mapped to process exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] coinlens_core::ValidationError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Validation(_) => 2,
            Self::Bind { .. } => 10,
            Self::Serve(_) => 1,
        }
    }
}
