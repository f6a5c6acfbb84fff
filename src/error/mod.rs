//! Unified error handling for the shell.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **Domain-specific Errors**: Auth, Network, Config and Route errors
//! - **Unified Error Type**: `ShellError` consolidates all error types
//! - **Result Type Alias**: `ShellResult<T>` for consistent return types
//!
//! # Error Categories
//!
//! | Category | Description | Handled by |
//! |----------|-------------|------------|
//! | Auth | No session, rejected credentials | Authentication gate |
//! | Network | Connection, timeout | Page (retry with `r`) |
//! | Server | API gateway 5xx | Page |
//! | Client | Undecodable response | Page |
//! | User | Bad input, unknown path | Form / navigation |
//! | Configuration | Invalid settings | Startup (fatal) |

mod auth;
mod category;
mod config;
mod network;
mod result;
mod shell_error;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use config::ConfigError;
pub use network::{classify_http_error, NetworkError};
pub use result::ShellResult;
pub use shell_error::{RouteNotFound, ShellError};
