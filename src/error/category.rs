//! Error category classification for unified error handling.
//!
//! Categories decide how a failure is surfaced: re-presenting the sign-in
//! form, showing a message inside a page, or aborting startup.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, timeout).
    /// Generally transient and retryable.
    Network,

    /// Authentication errors. The gate re-presents a form.
    Auth,

    /// Backend errors (HTTP 5xx from the API gateway).
    Server,

    /// Responses the client could not interpret.
    Client,

    /// User action required (bad credentials, unknown path).
    User,

    /// Invalid or missing settings. Fatal at startup.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Sign in again to continue",
            ErrorCategory::Server => {
                "The inventory API may be experiencing issues. Please try again later"
            }
            ErrorCategory::Client => "The API returned data this client does not understand",
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::Configuration => {
                "Check ~/.cloudinv/config.json and the CLOUDINV_* environment variables"
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::User.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Network.to_string(), "network");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }

    #[test]
    fn test_recovery_hints_not_empty() {
        for category in [
            ErrorCategory::Network,
            ErrorCategory::Auth,
            ErrorCategory::Server,
            ErrorCategory::Client,
            ErrorCategory::User,
            ErrorCategory::Configuration,
        ] {
            assert!(!category.recovery_hint().is_empty());
        }
    }
}
