//! Trait abstractions for dependency injection and testability.
//!
//! Production implementations live in [`crate::adapters`], test doubles in
//! [`crate::adapters::mock`].
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST)
//! - [`IdentityProvider`] - Hosted user-pool operations (sign-in, challenges, sessions)
//! - [`SessionStore`] - Persistence of the identity provider's session tokens
//! - [`HeaderAugmenter`] - Per-request header source attached to an API endpoint

pub mod header;
pub mod http;
pub mod identity;
pub mod session_store;

pub use header::{HeaderAugmenter, StaticHeaders};
pub use http::{Headers, HttpClient, HttpError, Response};
pub use identity::IdentityProvider;
pub use session_store::{SessionStore, StoreError};
