//! Error types for merx-link.
//!
//! All client operations return [`Result`]. Server-reported failures keep the
//! HTTP status and the parsed response body so callers can surface validation
//! details to the user.

use serde_json::Value;
use thiserror::Error;

/// Result type for merx-link operations
pub type Result<T> = std::result::Result<T, MerxLinkError>;

/// Errors that can occur when talking to a Merx server
#[derive(Error, Debug)]
pub enum MerxLinkError {
    /// Connection or transport failure
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    TimeoutError(String),

    /// Client was built or called with invalid settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Server answered with a non-success status
    ///
    /// `message` follows the server's own wording when the body carries one
    /// (`message`, `error` or `title` keys), otherwise the raw body text or a
    /// generic `Request failed: <status>` fallback. `body` keeps the parsed
    /// response payload for validation reporting.
    #[error("Server error ({status_code}): {message}")]
    ServerError {
        status_code: u16,
        message: String,
        body: Option<Value>,
    },
}

impl MerxLinkError {
    /// HTTP status of a server-reported failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MerxLinkError::ServerError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Parsed response body of a server-reported failure, if any
    pub fn server_body(&self) -> Option<&Value> {
        match self {
            MerxLinkError::ServerError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// True when the server rejected the request for lack of a valid session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }

    /// True when the failure belongs to the 4xx validation class
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(status) if (400..500).contains(&status))
    }
}

impl From<reqwest::Error> for MerxLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MerxLinkError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            MerxLinkError::SerializationError(err.to_string())
        } else {
            MerxLinkError::NetworkError(err.to_string())
        }
    }
}
