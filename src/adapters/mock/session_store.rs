//! In-memory session store for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::session::Session;
use crate::traits::{SessionStore, StoreError};

/// In-memory [`SessionStore`] with switchable failures.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    session: Arc<Mutex<Option<Session>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let store = Self::default();
        store.set_session(Some(session));
        store
    }

    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Current contents, read synchronously.
    pub fn get_session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(StoreError::LoadFailed("Mock load failure".to_string()));
        }
        Ok(self.get_session())
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(StoreError::SaveFailed("Mock save failure".to_string()));
        }
        self.set_session(Some(session.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.set_session(None);
        Ok(())
    }
}
