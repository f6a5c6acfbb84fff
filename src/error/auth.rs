//! Authentication-related error types.
//!
//! Every failure crossing the identity provider boundary ends up as one of
//! these variants. The gate catches them; they never reach page components
//! except as `NoActiveSession` from the session manager.

use thiserror::Error;

use crate::auth::ChallengeKind;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No user is signed in, or the stored session could not be renewed.
    #[error("No active session")]
    NoActiveSession,

    /// The provider requires an extra verification step.
    #[error("Additional verification required: {kind}")]
    ChallengeRequired { kind: ChallengeKind },

    /// The provider rejected the request (bad credentials, expired code,
    /// network failure while talking to the provider, ...).
    #[error("Identity provider error ({code}): {message}")]
    Provider { code: String, message: String },
}

impl AuthError {
    /// Build a provider error from a code and message.
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        AuthError::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the user has to sign in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            AuthError::NoActiveSession => true,
            AuthError::Provider { code, .. } => code == "NotAuthorizedException",
            AuthError::ChallengeRequired { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NoActiveSession => "You are not signed in. Please sign in to continue.".to_string(),
            AuthError::ChallengeRequired { kind } => {
                format!("{} is required to finish signing in.", kind)
            }
            AuthError::Provider { code, message } => match code.as_str() {
                "NotAuthorizedException" | "UserNotFoundException" => {
                    "Incorrect username or password.".to_string()
                }
                "CodeMismatchException" => {
                    "Invalid verification code provided, please try again.".to_string()
                }
                "ExpiredCodeException" => {
                    "The verification code has expired. Please request a new one.".to_string()
                }
                "InvalidPasswordException" => {
                    format!("Password does not meet the requirements: {}", message)
                }
                "LimitExceededException" | "TooManyRequestsException" => {
                    "Too many attempts. Please wait a moment and try again.".to_string()
                }
                "PasswordResetRequiredException" => {
                    "A password reset is required for this account.".to_string()
                }
                "UserNotConfirmedException" => "This account has not been confirmed yet.".to_string(),
                _ if message.is_empty() => format!("Sign-in failed ({}).", code),
                _ => message.clone(),
            },
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoActiveSession => "E_AUTH_NO_SESSION",
            AuthError::ChallengeRequired { .. } => "E_AUTH_CHALLENGE",
            AuthError::Provider { .. } => "E_AUTH_PROVIDER",
        }
    }
}
