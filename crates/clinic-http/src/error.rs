//! HTTP client error types and message normalization

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// Fallback shown when a failure carries no usable message
pub const GENERIC_ERROR: &str = "unknown error";

/// HTTP client errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// No response was received
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Authentication rejected and the refresh protocol has run its course
    #[error("Authentication rejected ({status}): {message}")]
    Auth { status: StatusCode, message: String },

    /// Server-side failure (HTTP >= 500); never retried
    #[error("Service unavailable ({status}): {message}")]
    Server { status: StatusCode, message: String },

    /// Any other non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Successful response whose body was not in the expected format
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl HttpError {
    /// Status code of the failing response, if one was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Auth { status, .. }
            | HttpError::Server { status, .. }
            | HttpError::Status { status, .. } => Some(*status),
            HttpError::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Human-readable message for display
    ///
    /// Derived from the response body when one was available, the generic
    /// fallback otherwise.
    pub fn message(&self) -> String {
        match self {
            HttpError::Auth { message, .. }
            | HttpError::Server { message, .. }
            | HttpError::Status { message, .. } => message.clone(),
            _ => GENERIC_ERROR.to_string(),
        }
    }

    /// True for 401/403 outcomes
    pub fn is_auth(&self) -> bool {
        matches!(self, HttpError::Auth { .. })
    }

    /// True for HTTP >= 500 outcomes, the degraded-service signal
    pub fn is_server_error(&self) -> bool {
        matches!(self, HttpError::Server { .. })
    }
}

/// Extract a display message from a failure response body
///
/// The backends answer with several shapes (`{"detail": …}` from the
/// gateway, `{"message": …}` from older services, occasionally plain text).
/// Fixed precedence: `detail` (string, else its JSON form), then `message`,
/// then the raw body, then [`GENERIC_ERROR`].
pub fn normalize_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(detail) => return detail.to_string(),
            None => {}
        }
        if let Some(serde_json::Value::String(message)) = value.get("message") {
            return message.clone();
        }
    }
    let raw = body.trim();
    if raw.is_empty() {
        GENERIC_ERROR.to_string()
    } else {
        raw.to_string()
    }
}
