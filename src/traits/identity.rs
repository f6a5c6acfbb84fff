//! Identity provider trait abstraction.
//!
//! The boundary to the hosted user pool. Every operation is async and may
//! fail with an [`AuthError`]; the authentication gate is the only caller of
//! the sign-in operations, the session manager the only caller of
//! [`current_session`](IdentityProvider::current_session) outside the gate.

use async_trait::async_trait;

use crate::auth::{AuthUser, CodeDelivery, ContactAttribute, PendingChallenge, SignInOutcome};
use crate::error::AuthError;
use crate::session::Session;

/// Trait for identity provider operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with username and password.
    ///
    /// Returns either a signed-in user or a challenge that must be answered
    /// through [`confirm_sign_in`](Self::confirm_sign_in) or
    /// [`complete_new_password`](Self::complete_new_password).
    async fn sign_in(&self, username: &str, password: &str) -> Result<SignInOutcome, AuthError>;

    /// Answer an MFA challenge.
    async fn confirm_sign_in(
        &self,
        challenge: &PendingChallenge,
        code: &str,
    ) -> Result<SignInOutcome, AuthError>;

    /// Answer a forced password change.
    async fn complete_new_password(
        &self,
        challenge: &PendingChallenge,
        new_password: &str,
    ) -> Result<SignInOutcome, AuthError>;

    /// Ask the provider to send a password reset code.
    async fn forgot_password(&self, username: &str) -> Result<CodeDelivery, AuthError>;

    /// Set a new password using a reset code.
    async fn forgot_password_submit(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Ask the provider to send a verification code to a contact attribute.
    async fn verify_contact(&self, attribute: ContactAttribute) -> Result<CodeDelivery, AuthError>;

    /// Confirm a contact attribute with the code that was sent to it.
    async fn verify_contact_submit(
        &self,
        attribute: ContactAttribute,
        code: &str,
    ) -> Result<(), AuthError>;

    /// Return the current session, refreshing it when needed.
    ///
    /// Fails with [`AuthError::NoActiveSession`] when nobody is signed in.
    async fn current_session(&self) -> Result<Session, AuthError>;

    /// Return the signed-in user and their attributes.
    async fn current_user(&self) -> Result<AuthUser, AuthError>;

    /// Forget the local session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
