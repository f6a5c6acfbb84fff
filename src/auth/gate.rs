//! The authentication gate state machine.
//!
//! The gate never performs I/O itself. [`AuthGate::submit`] turns a user
//! action into either a local state change or a [`PendingCall`]; the caller
//! runs the call through [`execute`](super::execute) (usually on a spawned
//! task) and feeds the result back through [`AuthGate::complete`]. Only one
//! call is in flight at a time, and a result whose id no longer matches the
//! pending call is dropped.

use tracing::{debug, info, warn};

use super::request::{execute, AuthSubmission, CallOutcome, Dispatch, PendingCall, ProviderRequest};
use super::state::{AuthPhase, AuthState, Operation, ResetStep, Transition, VerifyStep};
use super::user::ChallengeKind;
use crate::error::AuthError;
use crate::traits::IdentityProvider;

/// Notice shown on the sign-in form after a page call found no session.
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";

enum Step {
    Call(ProviderRequest),
    Local(AuthState),
    Reject(String),
}

/// Blocks the wrapped application until a validated session exists.
#[derive(Debug)]
pub struct AuthGate {
    state: AuthState,
    pending: Option<PendingCall>,
    next_call_id: u64,
}

impl AuthGate {
    /// Create a gate in `Loading` and return the session probe to run.
    pub fn start() -> (Self, PendingCall) {
        let mut gate = Self {
            state: AuthState::unauthenticated(),
            pending: None,
            next_call_id: 1,
        };
        let call = gate.begin(ProviderRequest::Probe);
        (gate, call)
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.phase()
    }

    pub fn pending(&self) -> Option<&PendingCall> {
        self.pending.as_ref()
    }

    /// Only an authenticated gate lets the wrapped application render.
    pub fn may_render_children(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// Apply a user action.
    pub fn submit(&mut self, submission: AuthSubmission) -> Dispatch {
        if let AuthState::Loading { operation, .. } = &self.state {
            if submission == AuthSubmission::Back && operation.is_abandonable() {
                debug!(operation = ?operation, "Abandoning in-flight call");
                self.pending = None;
                self.set(AuthState::unauthenticated());
                return Dispatch::Applied;
            }
            return Dispatch::Busy;
        }

        let step = match (&self.state, submission) {
            (AuthState::Unauthenticated { .. }, AuthSubmission::Credentials { username, password }) => {
                let username = username.trim().to_string();
                if username.is_empty() || password.is_empty() {
                    Step::Reject("Username and password are required".to_string())
                } else {
                    Step::Call(ProviderRequest::SignIn { username, password })
                }
            }
            (AuthState::Unauthenticated { .. }, AuthSubmission::RequestReset) => {
                Step::Local(AuthState::ResettingPassword(ResetStep::RequestCode))
            }
            (AuthState::ConfirmingSignIn(challenge), AuthSubmission::MfaCode { code }) => {
                let code = code.trim().to_string();
                if code.is_empty() {
                    Step::Reject("Code is required".to_string())
                } else {
                    Step::Call(ProviderRequest::ConfirmSignIn {
                        challenge: challenge.clone(),
                        code,
                    })
                }
            }
            (AuthState::RequiringNewPassword(challenge), AuthSubmission::NewPassword { password }) => {
                if password.is_empty() {
                    Step::Reject("New password is required".to_string())
                } else {
                    Step::Call(ProviderRequest::CompleteNewPassword {
                        challenge: challenge.clone(),
                        password,
                    })
                }
            }
            (
                AuthState::ResettingPassword(ResetStep::RequestCode),
                AuthSubmission::ResetUsername { username },
            ) => {
                let username = username.trim().to_string();
                if username.is_empty() {
                    Step::Reject("Username is required".to_string())
                } else {
                    Step::Call(ProviderRequest::ForgotPassword { username })
                }
            }
            (
                AuthState::ResettingPassword(ResetStep::SubmitCode { username, .. }),
                AuthSubmission::ResetConfirm { code, new_password },
            ) => {
                let code = code.trim().to_string();
                if code.is_empty() || new_password.is_empty() {
                    Step::Reject("Code and new password are required".to_string())
                } else {
                    Step::Call(ProviderRequest::ResetPassword {
                        username: username.clone(),
                        code,
                        new_password,
                    })
                }
            }
            (
                AuthState::VerifyingContact(VerifyStep::Choose { user, attributes }),
                AuthSubmission::ChooseContact { attribute },
            ) => {
                if attributes.contains(&attribute) {
                    Step::Call(ProviderRequest::RequestVerification {
                        user: user.clone(),
                        attribute,
                    })
                } else {
                    Step::Reject(format!("{} is not available to verify", attribute))
                }
            }
            (
                AuthState::VerifyingContact(VerifyStep::SubmitCode {
                    user, attribute, ..
                }),
                AuthSubmission::ContactCode { code },
            ) => {
                let code = code.trim().to_string();
                if code.is_empty() {
                    Step::Reject("Code is required".to_string())
                } else {
                    Step::Call(ProviderRequest::SubmitVerification {
                        user: user.clone(),
                        attribute: *attribute,
                        code,
                    })
                }
            }
            (AuthState::VerifyingContact(step), AuthSubmission::SkipVerification) => {
                Step::Local(AuthState::Authenticated(step.user().clone()))
            }
            (AuthState::Error { .. }, AuthSubmission::Retry) => {
                Step::Local(AuthState::unauthenticated())
            }
            (
                AuthState::ConfirmingSignIn(_)
                | AuthState::RequiringNewPassword(_)
                | AuthState::ResettingPassword(_)
                | AuthState::VerifyingContact(_)
                | AuthState::Error { .. },
                AuthSubmission::Back,
            ) => Step::Local(AuthState::unauthenticated()),
            (AuthState::Authenticated(_), AuthSubmission::SignOut) => {
                Step::Call(ProviderRequest::SignOut)
            }
            (state, submission) => {
                debug!(phase = %state.phase(), ?submission, "Submission not accepted");
                Step::Reject(format!(
                    "Not available while {}",
                    state.phase().as_str().replace('_', " ")
                ))
            }
        };

        match step {
            Step::Call(request) => Dispatch::Call(self.begin(request)),
            Step::Local(next) => {
                self.set(next);
                Dispatch::Applied
            }
            Step::Reject(reason) => Dispatch::Rejected(reason),
        }
    }

    /// Apply the result of a dispatched call.
    ///
    /// Returns `None` when `id` is not the pending call.
    pub fn complete(&mut self, id: u64, outcome: CallOutcome) -> Option<Transition> {
        let request = match &self.pending {
            Some(call) if call.id == id => call.request.clone(),
            _ => {
                debug!(call_id = id, "Ignoring stale identity result");
                return None;
            }
        };
        self.pending = None;

        let next = match (request, outcome) {
            (_, CallOutcome::Failed(err)) => {
                warn!(code = err.error_code(), error = %err, "Identity call failed");
                error_state(&err)
            }
            (ProviderRequest::Probe, CallOutcome::SignedIn(user)) => AuthState::Authenticated(user),
            (ProviderRequest::Probe, CallOutcome::NoSession) => AuthState::unauthenticated(),
            (_, CallOutcome::SignedIn(user)) => {
                if user.needs_contact_verification() {
                    let attributes = user.unverified_contacts();
                    AuthState::VerifyingContact(VerifyStep::Choose { user, attributes })
                } else {
                    AuthState::Authenticated(user)
                }
            }
            (_, CallOutcome::Challenge(challenge)) => match challenge.kind {
                ChallengeKind::NewPasswordRequired => {
                    AuthState::RequiringNewPassword(challenge)
                }
                _ => AuthState::ConfirmingSignIn(challenge),
            },
            (ProviderRequest::ForgotPassword { username }, CallOutcome::CodeSent(delivery)) => {
                AuthState::ResettingPassword(ResetStep::SubmitCode { username, delivery })
            }
            (
                ProviderRequest::RequestVerification { user, attribute },
                CallOutcome::CodeSent(delivery),
            ) => AuthState::VerifyingContact(VerifyStep::SubmitCode {
                user,
                attribute,
                delivery,
            }),
            (ProviderRequest::SubmitVerification { user, .. }, CallOutcome::Verified) => {
                AuthState::Authenticated(user)
            }
            (ProviderRequest::SignOut, CallOutcome::SignedOut) => AuthState::unauthenticated(),
            (request, outcome) => {
                warn!(operation = ?request.operation(), ?outcome, "Unexpected identity result");
                AuthState::Error {
                    code: "E_AUTH_UNEXPECTED".to_string(),
                    reason: "The identity provider returned an unexpected response.".to_string(),
                }
            }
        };

        let from = self.phase();
        self.set(next);
        Some(Transition {
            from,
            to: self.phase(),
        })
    }

    /// A page call reported that the session is gone.
    pub fn session_lost(&mut self) -> Option<Transition> {
        if !self.may_render_children() {
            return None;
        }
        info!("Session lost; returning to sign-in");
        let from = self.phase();
        self.set(AuthState::Unauthenticated {
            notice: Some(SESSION_EXPIRED_NOTICE.to_string()),
        });
        Some(Transition {
            from,
            to: self.phase(),
        })
    }

    /// Run a dispatched call to completion.
    pub async fn resolve(
        &mut self,
        identity: &dyn IdentityProvider,
        call: PendingCall,
    ) -> Option<Transition> {
        let outcome = execute(identity, call.request).await;
        self.complete(call.id, outcome)
    }

    /// Submit an action and, if it needs the provider, run it to completion.
    pub async fn drive(
        &mut self,
        identity: &dyn IdentityProvider,
        submission: AuthSubmission,
    ) -> Dispatch {
        let dispatch = self.submit(submission);
        if let Dispatch::Call(call) = &dispatch {
            self.resolve(identity, call.clone()).await;
        }
        dispatch
    }

    fn begin(&mut self, request: ProviderRequest) -> PendingCall {
        let call = PendingCall {
            id: self.next_call_id,
            request,
        };
        self.next_call_id += 1;

        let operation: Operation = call.request.operation();
        let previous = std::mem::replace(&mut self.state, AuthState::unauthenticated());
        self.set(AuthState::Loading {
            previous: Box::new(previous),
            operation,
        });
        self.pending = Some(call.clone());
        call
    }

    fn set(&mut self, next: AuthState) {
        if self.state.phase() != next.phase() {
            info!(from = %self.state.phase(), to = %next.phase(), "Auth state changed");
        }
        self.state = next;
    }
}

fn error_state(err: &AuthError) -> AuthState {
    let code = match err {
        AuthError::Provider { code, .. } => code.clone(),
        other => other.error_code().to_string(),
    };
    AuthState::Error {
        code,
        reason: err.user_message(),
    }
}
