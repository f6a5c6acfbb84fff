//! Configuration provider.
//!
//! Settings are loaded and validated at startup, then installed once for the
//! whole process with [`configure`]. Components normally receive an
//! `Arc<AppConfiguration>` directly; [`configured`] exists for code that has
//! no other way to reach it.

mod settings;

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::error::ConfigError;

pub use settings::{
    config_dir, default_config_path, ApiEndpoint, ApiSettings, AppConfiguration, AuthSettings,
    CONFIG_DIR, CONFIG_FILE, DEFAULT_API_NAME, DEFAULT_API_URL, DEFAULT_CLIENT_ID, DEFAULT_REGION,
    DEFAULT_USER_POOL_ID,
};

static CONFIGURATION: OnceCell<Arc<AppConfiguration>> = OnceCell::new();

/// Install the process-wide configuration.
///
/// Only the first call has an effect; later calls are ignored and return
/// `false`.
pub fn configure(config: Arc<AppConfiguration>) -> bool {
    match CONFIGURATION.set(config) {
        Ok(()) => {
            info!("Configuration installed");
            true
        }
        Err(_) => {
            warn!("configure() called more than once; keeping the first configuration");
            false
        }
    }
}

/// The installed configuration.
pub fn configured() -> Result<Arc<AppConfiguration>, ConfigError> {
    CONFIGURATION.get().cloned().ok_or(ConfigError::NotConfigured)
}
