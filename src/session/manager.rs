//! Session manager: turns the identity provider's session into request headers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AuthError, ShellResult};
use crate::session::Session;
use crate::traits::{HeaderAugmenter, Headers, IdentityProvider};

/// Produces the `Authorization` header for outgoing API calls.
///
/// Nothing is cached: every call asks the identity provider for the current
/// session, which may suspend while the provider refreshes it.
#[derive(Clone)]
pub struct SessionManager {
    identity: Arc<dyn IdentityProvider>,
}

impl SessionManager {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Retrieve a session that is valid right now.
    ///
    /// Fails with [`AuthError::NoActiveSession`] when no user is signed in or
    /// the provider hands back an already expired session.
    pub async fn current_session(&self) -> ShellResult<Session> {
        let session = self.identity.current_session().await?;
        if session.is_expired() {
            debug!(expires_at = session.expires_at, "Provider returned an expired session");
            return Err(AuthError::NoActiveSession.into());
        }
        Ok(session)
    }

    /// `{"Authorization": <id token>}` for the current session.
    pub async fn get_auth_header(&self) -> ShellResult<Headers> {
        let session = self.current_session().await?;
        Ok(session.authorization_header())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

#[async_trait]
impl HeaderAugmenter for SessionManager {
    async fn headers(&self) -> ShellResult<Headers> {
        self.get_auth_header().await
    }
}
