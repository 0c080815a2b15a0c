//! Status-code classification for failed remote calls.

use crate::error::{ErrorKind, RemoteError};

/// Classify a non-success HTTP status.
pub fn classify_status(status: u16) -> RemoteError {
    let (kind, message) = match status {
        400 => (ErrorKind::Validation, "Not valid data"),
        401 => (ErrorKind::Unauthorized, "You are not authorized"),
        403 => (
            ErrorKind::Forbidden,
            "You are not allowed to do this action",
        ),
        404 => (ErrorKind::NotFound, "Resource not found"),
        408 | 504 => (ErrorKind::Timeout, "Request has expired"),
        500 | 502 | 503 => (ErrorKind::Server, "Server error"),
        _ => (ErrorKind::Network, "Network error"),
    };
    RemoteError::new(kind, message).with_status(status)
}

/// Classify a failure that never produced a usable HTTP response.
pub fn classify_transport(err: &reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::new(ErrorKind::Timeout, "Request has expired");
    }
    if let Some(status) = err.status() {
        return classify_status(status.as_u16());
    }
    let message = err.to_string();
    if message.is_empty() {
        RemoteError::new(ErrorKind::Network, "Network error")
    } else {
        RemoteError::new(ErrorKind::Network, message)
    }
}
