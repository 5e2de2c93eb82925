//! Client error types

use thiserror::Error;

/// Error type for backend reads and mutations
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connectivity, timeout, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response envelope was malformed or missing data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Bearer credential missing or rejected
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected as invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
