//! Network-related error types.
//!
//! Errors from talking to the inventory API gateway.

use thiserror::Error;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Connection to the server failed.
    #[error("Connection failed to '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    #[error("{operation} timed out")]
    Timeout { operation: String },

    /// HTTP status error (non-2xx response).
    #[error("HTTP {status} error: {message}")]
    HttpStatus { status: u16, message: String },

    /// Body could not be decoded.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Generic network error.
    #[error("Network error: {message}")]
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } | NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::InvalidResponse { .. } | NetworkError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to reach the inventory API. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { operation } => {
                format!("The {} timed out. The API may be slow or unreachable.", operation)
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid.".to_string(),
                401 => "Authentication required. Please sign in again.".to_string(),
                403 => "Access denied. You don't have permission to view this data.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The API is experiencing issues. Please try again later.".to_string(),
                _ => format!("The API returned an error (HTTP {}).", status),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received an invalid response from the API.".to_string()
            }
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

/// Classify a transport-level [`HttpError`](crate::traits::HttpError) into a
/// [`NetworkError`].
pub fn classify_http_error(err: crate::traits::HttpError, url: &str) -> NetworkError {
    use crate::traits::HttpError;

    match err {
        HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
            url: url.to_string(),
            message,
        },
        HttpError::Timeout(_) => NetworkError::Timeout {
            operation: "API request".to_string(),
        },
        HttpError::ServerError { status, message } => NetworkError::HttpStatus { status, message },
        HttpError::InvalidUrl(message) => NetworkError::Other {
            message: format!("invalid URL {}: {}", url, message),
        },
        HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
    }
}
