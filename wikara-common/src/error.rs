//! Common error types for WIKARA

use thiserror::Error;

/// Common result type for WIKARA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the WIKARA crates
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote endpoint answered, but not with a usable result
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// JSON parse or encode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
