/// Core error types for Nothing Player
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for local (non-remote) failures
#[derive(Error, Debug)]
pub enum CoreError {
    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Errors raised by a `Backend` transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The service could not be reached (connect failure, timeout, dropped connection)
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The caller's identity was rejected
    #[error("Unauthorized")]
    Unauthorized,

    /// The service answered with an error
    #[error("Backend error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl BackendError {
    /// Whether the failure means the service is not reachable at all.
    ///
    /// Only these failures are reported to the network monitor as
    /// offline-equivalent; application-level rejections are not.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unreachable_counts_as_connectivity() {
        assert!(BackendError::Unreachable("timeout".into()).is_connectivity());
        assert!(!BackendError::Unauthorized.is_connectivity());
        assert!(!BackendError::Server {
            status: 500,
            message: "boom".into()
        }
        .is_connectivity());
        assert!(!BackendError::Parse("eof".into()).is_connectivity());
    }

    #[test]
    fn server_error_message_includes_status() {
        let err = BackendError::Server {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "Backend error (503): maintenance");
    }
}
