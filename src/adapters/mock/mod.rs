//! Mock implementations for testing.
//!
//! Test doubles for every trait in [`crate::traits`], usable without network
//! or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockIdentityProvider`] - Identity provider with scripted outcomes
//! - [`InMemorySessionStore`] - In-memory session storage

pub mod http;
pub mod identity;
pub mod session_store;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use identity::MockIdentityProvider;
pub use session_store::InMemorySessionStore;
