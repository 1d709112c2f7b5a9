//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the API client and the session store.
///
/// None of these are fatal: every variant resolves to a message that can be
/// shown inline while the session settles into a stable state.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad credentials or rejected login/registration.
    #[error("Authentication failed: {reason}")]
    AuthFailed { reason: String },

    /// The server answered 401. Local session state has already been cleared.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Non-2xx business error.
    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: StatusCode, message: String },

    /// No response was obtained.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Local file I/O (uploads, downloads).
    #[error("I/O error: {0}")]
    Io(String),

    /// Header value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// An id cannot be used as a path segment (empty, `.` or `..`).
    #[error("Invalid path segment: '{0}'")]
    InvalidPath(String),

    /// Client configuration problem.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// True when the failure forced the session back to anonymous.
    pub fn is_auth_related(&self) -> bool {
        matches!(self, ApiError::AuthFailed { .. } | ApiError::SessionExpired)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    /// Message suitable for inline display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::AuthFailed { reason } => reason.clone(),
            ApiError::RequestFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(e: serde_yaml::Error) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ApiError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ApiError::InvalidHeader(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::RequestFailed {
            status: StatusCode::BAD_REQUEST,
            message: "Bedrijfsnaam is vereist".to_string(),
        };
        assert_eq!(err.user_message(), "Bedrijfsnaam is vereist");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!err.is_auth_related());
    }

    #[test]
    fn test_session_expired_is_auth_related() {
        assert!(ApiError::SessionExpired.is_auth_related());
        assert_eq!(ApiError::SessionExpired.status(), Some(StatusCode::UNAUTHORIZED));
    }
}
