//! Unified error type for the application shell.
//!
//! `ShellError` consolidates the domain-specific error types so callers can
//! categorise, log and present any failure the same way.

use thiserror::Error;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::config::ConfigError;
use super::network::NetworkError;

/// No route pattern matched the requested path.
///
/// The shell renders navigation only in this case; the error is logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No route matches '{path}'")]
pub struct RouteNotFound {
    pub path: String,
}

/// Unified error type for the application shell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// Identity provider and session errors.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// API gateway errors.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Settings errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unmatched navigation path.
    #[error(transparent)]
    Route(#[from] RouteNotFound),
}

impl ShellError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShellError::Auth(err) => {
                if err.requires_reauth() {
                    ErrorCategory::Auth
                } else {
                    ErrorCategory::User
                }
            }
            ShellError::Network(NetworkError::HttpStatus { status, .. }) => match *status {
                401 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            ShellError::Network(NetworkError::InvalidResponse { .. }) => ErrorCategory::Client,
            ShellError::Network(_) => ErrorCategory::Network,
            ShellError::Config(_) => ErrorCategory::Configuration,
            ShellError::Route(_) => ErrorCategory::User,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ShellError::Network(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Check if this error requires the user to sign in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            ShellError::Auth(err) => err.requires_reauth(),
            ShellError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            _ => false,
        }
    }

    /// True when the failure is the session manager reporting no signed-in user.
    pub fn is_no_active_session(&self) -> bool {
        matches!(self, ShellError::Auth(AuthError::NoActiveSession))
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ShellError::Auth(err) => err.user_message(),
            ShellError::Network(err) => err.user_message(),
            ShellError::Config(err) => err.to_string(),
            ShellError::Route(err) => err.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ShellError::Auth(err) => err.error_code(),
            ShellError::Network(err) => err.error_code(),
            ShellError::Config(err) => err.error_code(),
            ShellError::Route(_) => "E_ROUTE_NOT_FOUND",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        ShellError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
