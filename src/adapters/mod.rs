//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`CognitoIdentityProvider`] - Cognito user-pool JSON API
//! - [`FileSessionStore`] - File-based session storage
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockIdentityProvider`] - Scripted identity outcomes
//! - [`mock::InMemorySessionStore`] - In-memory session storage

pub mod cognito;
pub mod file_session_store;
pub mod mock;
pub mod reqwest_http;

pub use cognito::CognitoIdentityProvider;
pub use file_session_store::FileSessionStore;
pub use mock::{InMemorySessionStore, MockHttpClient, MockIdentityProvider};
pub use reqwest_http::ReqwestHttpClient;
