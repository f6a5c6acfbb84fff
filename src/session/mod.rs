//! Session access for outgoing API calls.
//!
//! - [`Session`]: the tokens the identity provider issues
//! - [`SessionManager`]: fetches a fresh session per request and exposes it
//!   as an `Authorization` header

mod manager;
mod token;

pub use manager::SessionManager;
pub use token::{jwt_expiry, Session, AUTHORIZATION_HEADER};
