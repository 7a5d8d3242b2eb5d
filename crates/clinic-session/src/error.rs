//! Session error types

use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised by session persistence
#[derive(Debug, Error)]
pub enum SessionError {
    /// Underlying filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted record could not be encoded or decoded
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
