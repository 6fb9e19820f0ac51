//! Error types for the Nothing Player server client.

use thiserror::Error;

/// Errors raised while setting up the client.
///
/// Per-call failures are reported as `nothing_core::BackendError` through the
/// `Backend` trait.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// Result type for server client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;
