//! Gate inputs, provider requests and their outcomes.

use tracing::{debug, warn};

use super::state::Operation;
use super::user::{AuthUser, CodeDelivery, ContactAttribute, PendingChallenge, SignInOutcome};
use crate::error::AuthError;
use crate::traits::IdentityProvider;

/// Something the user did on a gate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSubmission {
    Credentials { username: String, password: String },
    MfaCode { code: String },
    NewPassword { password: String },
    RequestReset,
    ResetUsername { username: String },
    ResetConfirm { code: String, new_password: String },
    ChooseContact { attribute: ContactAttribute },
    ContactCode { code: String },
    SkipVerification,
    Retry,
    Back,
    SignOut,
}

/// A call the gate wants made against the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRequest {
    /// Look for an existing session, then load the user.
    Probe,
    SignIn {
        username: String,
        password: String,
    },
    ConfirmSignIn {
        challenge: PendingChallenge,
        code: String,
    },
    CompleteNewPassword {
        challenge: PendingChallenge,
        password: String,
    },
    ForgotPassword {
        username: String,
    },
    /// Set the new password, then sign in with it.
    ResetPassword {
        username: String,
        code: String,
        new_password: String,
    },
    RequestVerification {
        user: AuthUser,
        attribute: ContactAttribute,
    },
    SubmitVerification {
        user: AuthUser,
        attribute: ContactAttribute,
        code: String,
    },
    SignOut,
}

impl ProviderRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ProviderRequest::Probe => Operation::Probe,
            ProviderRequest::SignIn { .. } => Operation::SignIn,
            ProviderRequest::ConfirmSignIn { .. } => Operation::ConfirmSignIn,
            ProviderRequest::CompleteNewPassword { .. } => Operation::CompleteNewPassword,
            ProviderRequest::ForgotPassword { .. } => Operation::RequestReset,
            ProviderRequest::ResetPassword { .. } => Operation::SubmitReset,
            ProviderRequest::RequestVerification { .. } => Operation::RequestVerification,
            ProviderRequest::SubmitVerification { .. } => Operation::SubmitVerification,
            ProviderRequest::SignOut => Operation::SignOut,
        }
    }
}

/// A dispatched provider request tagged with the id `complete` must echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub id: u64,
    pub request: ProviderRequest,
}

/// What `submit` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Execute this call and report back through `complete`.
    Call(PendingCall),
    /// A call is already in flight.
    Busy,
    /// Not valid in the current state, or a required field is empty.
    Rejected(String),
    /// Handled locally; the state already changed.
    Applied,
}

/// Result of executing a [`ProviderRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    SignedIn(AuthUser),
    Challenge(PendingChallenge),
    CodeSent(CodeDelivery),
    Verified,
    SignedOut,
    NoSession,
    Failed(AuthError),
}

impl From<Result<SignInOutcome, AuthError>> for CallOutcome {
    fn from(result: Result<SignInOutcome, AuthError>) -> Self {
        match result {
            Ok(SignInOutcome::SignedIn(user)) => CallOutcome::SignedIn(user),
            Ok(SignInOutcome::Challenge(challenge)) => CallOutcome::Challenge(challenge),
            Err(err) => CallOutcome::Failed(err),
        }
    }
}

/// Run one request against the identity provider.
///
/// Never fails: provider errors come back as [`CallOutcome::Failed`].
pub async fn execute(identity: &dyn IdentityProvider, request: ProviderRequest) -> CallOutcome {
    debug!(operation = ?request.operation(), "Executing identity request");
    match request {
        ProviderRequest::Probe => match identity.current_session().await {
            Ok(_) => match identity.current_user().await {
                Ok(user) => CallOutcome::SignedIn(user),
                Err(AuthError::NoActiveSession) => CallOutcome::NoSession,
                Err(err) => CallOutcome::Failed(err),
            },
            Err(AuthError::NoActiveSession) => CallOutcome::NoSession,
            Err(err) => CallOutcome::Failed(err),
        },
        ProviderRequest::SignIn { username, password } => {
            identity.sign_in(&username, &password).await.into()
        }
        ProviderRequest::ConfirmSignIn { challenge, code } => {
            identity.confirm_sign_in(&challenge, &code).await.into()
        }
        ProviderRequest::CompleteNewPassword {
            challenge,
            password,
        } => identity.complete_new_password(&challenge, &password).await.into(),
        ProviderRequest::ForgotPassword { username } => {
            match identity.forgot_password(&username).await {
                Ok(delivery) => CallOutcome::CodeSent(delivery),
                Err(err) => CallOutcome::Failed(err),
            }
        }
        ProviderRequest::ResetPassword {
            username,
            code,
            new_password,
        } => {
            if let Err(err) = identity
                .forgot_password_submit(&username, &code, &new_password)
                .await
            {
                return CallOutcome::Failed(err);
            }
            identity.sign_in(&username, &new_password).await.into()
        }
        ProviderRequest::RequestVerification { attribute, .. } => {
            match identity.verify_contact(attribute).await {
                Ok(delivery) => CallOutcome::CodeSent(delivery),
                Err(err) => CallOutcome::Failed(err),
            }
        }
        ProviderRequest::SubmitVerification {
            attribute, code, ..
        } => match identity.verify_contact_submit(attribute, &code).await {
            Ok(()) => CallOutcome::Verified,
            Err(err) => CallOutcome::Failed(err),
        },
        ProviderRequest::SignOut => {
            if let Err(err) = identity.sign_out().await {
                warn!(error = %err, "Sign-out failed; discarding local state anyway");
            }
            CallOutcome::SignedOut
        }
    }
}
