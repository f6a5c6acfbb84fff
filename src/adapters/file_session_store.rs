//! File-based session store.
//!
//! Stores the identity provider's tokens in `~/.cloudinv/.session.json`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::config_dir;
use crate::session::Session;
use crate::traits::{SessionStore, StoreError};

/// The session file name inside the config directory.
pub const SESSION_FILE: &str = ".session.json";

/// File-backed [`SessionStore`].
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at the default location.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        config_dir().map(|dir| Self::with_path(dir.join(SESSION_FILE)))
    }

    /// Store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path).map_err(|e| StoreError::LoadFailed(e.to_string()))?;
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // A corrupt file is treated as signed out rather than fatal.
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        }
        let file = File::create(&self.path).map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        restrict_permissions(&self.path);

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, session)
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path).map_err(|e| StoreError::ClearFailed(e.to_string()))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        warn!(error = %e, "Could not restrict session file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
