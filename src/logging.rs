//! File logging.
//!
//! The terminal belongs to the UI, so log lines go to
//! `~/.cloudinv/logs/cloudinv.log`. Filtering follows `CLOUDINV_LOG`
//! (an `EnvFilter` directive), defaulting to `info`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::config_dir;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CLOUDINV_LOG";
pub const LOG_FILE: &str = "cloudinv.log";
const DEFAULT_FILTER: &str = "info";

/// Directory the log file lives in.
pub fn log_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Build the filter from `CLOUDINV_LOG`, falling back to `info` when unset
/// or unparsable.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `dir/cloudinv.log`.
///
/// Returns the file path on success. Any failure (no home directory,
/// unwritable file, subscriber already set) leaves logging disabled.
pub fn init_in(dir: &Path) -> Option<PathBuf> {
    fs::create_dir_all(dir).ok()?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .ok()?;

    Some(path)
}

/// Install file logging under the default directory.
pub fn init() -> Option<PathBuf> {
    let path = init_in(&log_dir()?)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cloudinv starting");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_log_dir_under_config_dir() {
        if let (Some(logs), Some(config)) = (log_dir(), config_dir()) {
            assert_eq!(logs, config.join("logs"));
        }
    }

    #[test]
    #[serial]
    fn test_env_filter_falls_back_to_default() {
        std::env::remove_var(LOG_ENV);
        assert_eq!(env_filter().to_string(), DEFAULT_FILTER);

        std::env::set_var(LOG_ENV, "cloudinv=debug");
        assert_eq!(env_filter().to_string(), "cloudinv=debug");
        std::env::remove_var(LOG_ENV);
    }

    #[test]
    #[serial]
    fn test_init_in_creates_log_file() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("nested").join("logs");
        // A second global subscriber cannot be installed, so only the file is
        // guaranteed; the return value depends on test ordering.
        let _ = init_in(&logs);
        assert!(logs.join(LOG_FILE).exists());
    }
}
