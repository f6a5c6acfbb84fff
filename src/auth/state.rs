//! Authentication gate states.

use super::user::{AuthUser, CodeDelivery, ContactAttribute, PendingChallenge};

/// Provider operation a `Loading` state is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Probe,
    SignIn,
    ConfirmSignIn,
    CompleteNewPassword,
    RequestReset,
    SubmitReset,
    RequestVerification,
    SubmitVerification,
    SignOut,
}

impl Operation {
    /// Status line shown while the call is in flight.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Probe => "Checking session...",
            Operation::SignIn => "Signing in...",
            Operation::ConfirmSignIn => "Confirming code...",
            Operation::CompleteNewPassword => "Setting new password...",
            Operation::RequestReset => "Sending reset code...",
            Operation::SubmitReset => "Resetting password...",
            Operation::RequestVerification => "Sending verification code...",
            Operation::SubmitVerification => "Verifying...",
            Operation::SignOut => "Signing out...",
        }
    }

    /// Whether the user may back out of this call.
    pub fn is_abandonable(&self) -> bool {
        !matches!(self, Operation::Probe | Operation::SignOut)
    }
}

/// Password reset sub-steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetStep {
    RequestCode,
    SubmitCode {
        username: String,
        delivery: CodeDelivery,
    },
}

/// Contact verification sub-steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStep {
    Choose {
        user: AuthUser,
        attributes: Vec<ContactAttribute>,
    },
    SubmitCode {
        user: AuthUser,
        attribute: ContactAttribute,
        delivery: CodeDelivery,
    },
}

impl VerifyStep {
    pub fn user(&self) -> &AuthUser {
        match self {
            VerifyStep::Choose { user, .. } | VerifyStep::SubmitCode { user, .. } => user,
        }
    }
}

/// State of the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// A provider call is in flight.
    Loading {
        previous: Box<AuthState>,
        operation: Operation,
    },
    Unauthenticated {
        notice: Option<String>,
    },
    ConfirmingSignIn(PendingChallenge),
    RequiringNewPassword(PendingChallenge),
    ResettingPassword(ResetStep),
    VerifyingContact(VerifyStep),
    Authenticated(AuthUser),
    Error {
        code: String,
        reason: String,
    },
}

impl AuthState {
    pub fn unauthenticated() -> Self {
        AuthState::Unauthenticated { notice: None }
    }

    pub fn phase(&self) -> AuthPhase {
        match self {
            AuthState::Loading { .. } => AuthPhase::Loading,
            AuthState::Unauthenticated { .. } => AuthPhase::Unauthenticated,
            AuthState::ConfirmingSignIn(_) => AuthPhase::ConfirmingSignIn,
            AuthState::RequiringNewPassword(_) => AuthPhase::RequiringNewPassword,
            AuthState::ResettingPassword(_) => AuthPhase::ResettingPassword,
            AuthState::VerifyingContact(_) => AuthPhase::VerifyingContact,
            AuthState::Authenticated(_) => AuthPhase::Authenticated,
            AuthState::Error { .. } => AuthPhase::Error,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Fieldless discriminant of [`AuthState`], for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPhase {
    Loading,
    Unauthenticated,
    ConfirmingSignIn,
    RequiringNewPassword,
    ResettingPassword,
    VerifyingContact,
    Authenticated,
    Error,
}

impl AuthPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPhase::Loading => "loading",
            AuthPhase::Unauthenticated => "unauthenticated",
            AuthPhase::ConfirmingSignIn => "confirming_sign_in",
            AuthPhase::RequiringNewPassword => "requiring_new_password",
            AuthPhase::ResettingPassword => "resetting_password",
            AuthPhase::VerifyingContact => "verifying_contact",
            AuthPhase::Authenticated => "authenticated",
            AuthPhase::Error => "error",
        }
    }
}

impl std::fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state change applied by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: AuthPhase,
    pub to: AuthPhase,
}
