//! API layer error types

use thiserror::Error;

use clinic_http::HttpError;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the typed endpoint layer
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or protocol failure, already normalized by the client
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Response parsed as JSON but not as the expected shape
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    /// Session persistence failure
    #[error("Session error: {0}")]
    Session(#[from] clinic_session::SessionError),
}

impl ApiError {
    /// Human-readable message for display
    pub fn message(&self) -> String {
        match self {
            ApiError::Http(err) => err.message(),
            ApiError::Decode(_) | ApiError::Session(_) => {
                clinic_http::GENERIC_ERROR.to_string()
            }
        }
    }
}
