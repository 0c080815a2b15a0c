//! Error types
//!
//! `ApiError` is the crate-wide error. Failures coming back from the remote file
//! service are classified into a `RemoteError` carrying an `ErrorKind`, the HTTP
//! status (when there was one) and the moment it happened.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Classification of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Network,
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Server,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Server => "SERVER",
            ErrorKind::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure from the remote file service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({kind}{})", status_suffix(.status))]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub occurred_at: DateTime<Utc>,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" {}", s)).unwrap_or_default()
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Remote(#[from] RemoteError),

    /// Another mutation is still in flight.
    #[error("Another operation is already in progress")]
    Busy,

    /// A folder could not be loaded; carries the message the store published.
    #[error("Failed to load folder: {0}")]
    LoadFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure together with the notifications raised on the way to it.
    #[error("{notes}\n{error}")]
    Notified { notes: String, error: Box<ApiError> },
}

impl ApiError {
    /// Message suitable for showing to a user, without the classification suffix.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Remote(remote) => remote.message.clone(),
            ApiError::Notified { error, .. } => error.user_message(),
            other => other.to_string(),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Remote(remote) => Some(remote.kind),
            ApiError::Notified { error, .. } => error.kind(),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_display_includes_kind_and_status() {
        let err = RemoteError::new(ErrorKind::NotFound, "Resource not found").with_status(404);
        assert_eq!(err.to_string(), "Resource not found (NOT_FOUND 404)");
    }

    #[test]
    fn user_message_strips_classification() {
        let err = ApiError::from(RemoteError::new(ErrorKind::Server, "Server error"));
        assert_eq!(err.user_message(), "Server error");
        assert_eq!(err.kind(), Some(ErrorKind::Server));
        assert_eq!(ApiError::Busy.kind(), None);
    }

    #[test]
    fn remote_error_without_status_omits_it() {
        let err = RemoteError::new(ErrorKind::Network, "Network error");
        assert_eq!(err.to_string(), "Network error (NETWORK)");
    }

    #[test]
    fn notified_error_shows_notes_then_the_failure() {
        let inner = ApiError::from(RemoteError::new(ErrorKind::Server, "Server error").with_status(500));
        let err = ApiError::Notified {
            notes: "Error: Could not delete selected items".to_string(),
            error: Box::new(inner),
        };
        assert_eq!(
            err.to_string(),
            "Error: Could not delete selected items\nServer error (SERVER 500)"
        );
        assert_eq!(err.kind(), Some(ErrorKind::Server));
        assert_eq!(err.user_message(), "Server error");
    }
}
