//! Configuration error types.
//!
//! Raised while loading and validating [`AppConfiguration`](crate::config::AppConfiguration).
//! These are startup-time fatal: `main` reports them and exits.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting is empty.
    #[error("Missing required setting '{field}'")]
    MissingField { field: &'static str },

    /// An endpoint is not an http(s) URL.
    #[error("Endpoint '{name}' has an invalid URL: {url}")]
    InvalidUrl { name: String, url: String },

    /// Two endpoints share a name.
    #[error("Duplicate API endpoint name '{name}'")]
    DuplicateApi { name: String },

    /// A call referenced an endpoint that is not configured.
    #[error("No API endpoint named '{name}' is configured")]
    UnknownApi { name: String },

    /// The configuration file exists but could not be read or parsed.
    #[error("Failed to read configuration file {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// No configuration has been installed yet.
    #[error("Configuration has not been installed")]
    NotConfigured,
}

impl ConfigError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingField { .. } => "E_CFG_MISSING",
            ConfigError::InvalidUrl { .. } => "E_CFG_URL",
            ConfigError::DuplicateApi { .. } => "E_CFG_DUP_API",
            ConfigError::UnknownApi { .. } => "E_CFG_UNKNOWN_API",
            ConfigError::Unreadable { .. } => "E_CFG_FILE",
            ConfigError::NotConfigured => "E_CFG_NONE",
        }
    }
}
