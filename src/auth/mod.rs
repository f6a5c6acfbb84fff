//! Authentication gate.
//!
//! This module provides:
//! - Identity types shared with the provider adapter ([`AuthUser`], [`PendingChallenge`], ...)
//! - The gate's states ([`AuthState`])
//! - The state machine itself ([`AuthGate`]) and the requests it dispatches

mod gate;
mod request;
mod state;
mod user;

pub use gate::{AuthGate, SESSION_EXPIRED_NOTICE};
pub use request::{execute, AuthSubmission, CallOutcome, Dispatch, PendingCall, ProviderRequest};
pub use state::{AuthPhase, AuthState, Operation, ResetStep, Transition, VerifyStep};
pub use user::{AuthUser, ChallengeKind, CodeDelivery, ContactAttribute, PendingChallenge, SignInOutcome};
