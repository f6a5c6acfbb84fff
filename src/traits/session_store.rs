//! Session store trait abstraction.
//!
//! The identity provider adapter persists its tokens through this trait so the
//! shell can survive restarts without the UI ever holding tokens itself.

use async_trait::async_trait;

use crate::session::Session;

/// Session store operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Failed to load the session
    LoadFailed(String),
    /// Failed to save the session
    SaveFailed(String),
    /// Failed to clear the session
    ClearFailed(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::LoadFailed(msg) => write!(f, "Failed to load session: {}", msg),
            StoreError::SaveFailed(msg) => write!(f, "Failed to save session: {}", msg),
            StoreError::ClearFailed(msg) => write!(f, "Failed to clear session: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Trait for session storage and retrieval.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the stored session.
    ///
    /// # Returns
    /// - `Ok(Some(session))` if a session is stored
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if loading failed
    async fn load(&self) -> Result<Option<Session>, StoreError>;

    /// Replace the stored session.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove the stored session. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<(), StoreError>;
}
