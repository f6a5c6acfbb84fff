//! Inventory API access.

mod client;

pub use client::{build_url, ApiClient};
