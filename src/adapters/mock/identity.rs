//! Scripted identity provider for testing.
//!
//! Each operation family has a queue of scripted results. When a queue is
//! empty the mock behaves like a permissive user pool: sign-in succeeds and
//! stores a fresh session, codes are "sent", submissions succeed.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::auth::{AuthUser, CodeDelivery, ContactAttribute, PendingChallenge, SignInOutcome};
use crate::error::AuthError;
use crate::session::Session;
use crate::traits::IdentityProvider;

type Queue<T> = Arc<Mutex<VecDeque<Result<T, AuthError>>>>;

/// Mock [`IdentityProvider`] recording every call.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    session: Arc<Mutex<Option<Session>>>,
    user: Arc<Mutex<Option<AuthUser>>>,
    session_error: Arc<Mutex<Option<AuthError>>>,
    sign_in_results: Queue<SignInOutcome>,
    challenge_results: Queue<SignInOutcome>,
    code_results: Queue<CodeDelivery>,
    submit_results: Queue<()>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that already holds a valid session for `user`.
    pub fn signed_in(user: AuthUser) -> Self {
        let mock = Self::new();
        mock.set_session(Some(Self::fresh_session()));
        mock.set_user(Some(user));
        mock
    }

    /// A session valid for one hour.
    pub fn fresh_session() -> Session {
        Session {
            id_token: "mock-id-token".to_string(),
            access_token: "mock-access-token".to_string(),
            refresh_token: Some("mock-refresh-token".to_string()),
            expires_at: chrono::Utc::now().timestamp() + 3600,
        }
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }

    pub fn session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    pub fn set_user(&self, user: Option<AuthUser>) {
        *self.user.lock().unwrap() = user;
    }

    /// Make `current_session` fail with `error` until cleared.
    pub fn set_session_error(&self, error: Option<AuthError>) {
        *self.session_error.lock().unwrap() = error;
    }

    /// Script the next `sign_in` result.
    pub fn push_sign_in(&self, result: Result<SignInOutcome, AuthError>) {
        self.sign_in_results.lock().unwrap().push_back(result);
    }

    /// Script the next `confirm_sign_in` / `complete_new_password` result.
    pub fn push_challenge_answer(&self, result: Result<SignInOutcome, AuthError>) {
        self.challenge_results.lock().unwrap().push_back(result);
    }

    /// Script the next `forgot_password` / `verify_contact` result.
    pub fn push_code(&self, result: Result<CodeDelivery, AuthError>) {
        self.code_results.lock().unwrap().push_back(result);
    }

    /// Script the next `forgot_password_submit` / `verify_contact_submit` result.
    pub fn push_submit(&self, result: Result<(), AuthError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    fn record(&self, operation: &'static str) {
        self.calls.lock().unwrap().push(operation);
    }

    fn next<T>(queue: &Queue<T>) -> Option<Result<T, AuthError>> {
        queue.lock().unwrap().pop_front()
    }

    fn finish_sign_in(&self, username: &str, result: Result<SignInOutcome, AuthError>) -> Result<SignInOutcome, AuthError> {
        if let Ok(SignInOutcome::SignedIn(user)) = &result {
            self.set_session(Some(Self::fresh_session()));
            self.set_user(Some(user.clone()));
        }
        if result.is_ok() && self.user.lock().unwrap().is_none() {
            self.set_user(Some(AuthUser::new(username)));
        }
        result
    }

    fn default_user(&self, username: &str) -> AuthUser {
        self.user
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| AuthUser::new(username))
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self, username: &str, _password: &str) -> Result<SignInOutcome, AuthError> {
        self.record("sign_in");
        let result = Self::next(&self.sign_in_results)
            .unwrap_or_else(|| Ok(SignInOutcome::SignedIn(self.default_user(username))));
        self.finish_sign_in(username, result)
    }

    async fn confirm_sign_in(
        &self,
        challenge: &PendingChallenge,
        _code: &str,
    ) -> Result<SignInOutcome, AuthError> {
        self.record("confirm_sign_in");
        let result = Self::next(&self.challenge_results).unwrap_or_else(|| {
            Ok(SignInOutcome::SignedIn(self.default_user(&challenge.username)))
        });
        self.finish_sign_in(&challenge.username, result)
    }

    async fn complete_new_password(
        &self,
        challenge: &PendingChallenge,
        _new_password: &str,
    ) -> Result<SignInOutcome, AuthError> {
        self.record("complete_new_password");
        let result = Self::next(&self.challenge_results).unwrap_or_else(|| {
            Ok(SignInOutcome::SignedIn(self.default_user(&challenge.username)))
        });
        self.finish_sign_in(&challenge.username, result)
    }

    async fn forgot_password(&self, _username: &str) -> Result<CodeDelivery, AuthError> {
        self.record("forgot_password");
        Self::next(&self.code_results).unwrap_or_else(|| Ok(CodeDelivery::to("u***@e***.com")))
    }

    async fn forgot_password_submit(
        &self,
        _username: &str,
        _code: &str,
        _new_password: &str,
    ) -> Result<(), AuthError> {
        self.record("forgot_password_submit");
        Self::next(&self.submit_results).unwrap_or(Ok(()))
    }

    async fn verify_contact(&self, _attribute: ContactAttribute) -> Result<CodeDelivery, AuthError> {
        self.record("verify_contact");
        Self::next(&self.code_results).unwrap_or_else(|| Ok(CodeDelivery::default()))
    }

    async fn verify_contact_submit(
        &self,
        attribute: ContactAttribute,
        _code: &str,
    ) -> Result<(), AuthError> {
        self.record("verify_contact_submit");
        let result = Self::next(&self.submit_results).unwrap_or(Ok(()));
        if result.is_ok() {
            if let Some(user) = self.user.lock().unwrap().as_mut() {
                user.attributes
                    .insert(attribute.verified_flag().to_string(), "true".to_string());
            }
        }
        result
    }

    async fn current_session(&self) -> Result<Session, AuthError> {
        self.record("current_session");
        if let Some(err) = self.session_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.session().ok_or(AuthError::NoActiveSession)
    }

    async fn current_user(&self) -> Result<AuthUser, AuthError> {
        self.record("current_user");
        if self.session().is_none() {
            return Err(AuthError::NoActiveSession);
        }
        self.user.lock().unwrap().clone().ok_or(AuthError::NoActiveSession)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.record("sign_out");
        self.set_session(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_sign_in_stores_session() {
        let mock = MockIdentityProvider::new();
        assert_eq!(mock.current_session().await, Err(AuthError::NoActiveSession));

        let outcome = mock.sign_in("alice", "pw").await.unwrap();
        assert_eq!(outcome, SignInOutcome::SignedIn(AuthUser::new("alice")));
        assert!(mock.current_session().await.is_ok());
        assert_eq!(mock.current_user().await.unwrap().username, "alice");
        assert_eq!(mock.calls(), vec!["current_session", "sign_in", "current_session", "current_user"]);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mock = MockIdentityProvider::new();
        mock.push_sign_in(Err(AuthError::provider("NotAuthorizedException", "nope")));
        assert!(mock.sign_in("alice", "pw").await.is_err());
        assert!(mock.session().is_none());
        assert!(mock.sign_in("alice", "pw").await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let mock = MockIdentityProvider::signed_in(AuthUser::new("alice"));
        mock.sign_out().await.unwrap();
        assert_eq!(mock.current_user().await, Err(AuthError::NoActiveSession));
        assert_eq!(mock.call_count("sign_out"), 1);
    }
}
