//! cloudinv - a terminal dashboard for a cloud resource inventory API
//!
//! The dashboard sits behind an authentication gate backed by a Cognito user
//! pool. Once signed in, a routed shell shows one page per resource type,
//! each fetched from the inventory API with the session's id token.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pages;
pub mod router;
pub mod session;
pub mod terminal;
pub mod traits;
pub mod ui;
