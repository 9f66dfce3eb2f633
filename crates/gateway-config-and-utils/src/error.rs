//! Core error types for the gateway.

use thiserror::Error;

/// Core error type for configuration and startup.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Listen address that does not parse as `host:port`
    #[error("Invalid listen address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        source: std::net::AddrParseError,
    },

    /// Path error (e.g., home directory not found)
    #[error("Path error: {0}")]
    Path(String),
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
