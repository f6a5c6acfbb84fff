//! Per-request header augmentation.

use async_trait::async_trait;

use crate::error::ShellResult;
use crate::traits::Headers;

/// Produces the headers attached to an outgoing API request.
///
/// The API client calls [`headers`](HeaderAugmenter::headers) immediately
/// before every request, so an implementation that reads a session always
/// yields a fresh token.
#[async_trait]
pub trait HeaderAugmenter: Send + Sync {
    async fn headers(&self) -> ShellResult<Headers>;
}

/// Augmenter that always returns the same headers.
///
/// Useful for public endpoints and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(pub Headers);

#[async_trait]
impl HeaderAugmenter for StaticHeaders {
    async fn headers(&self) -> ShellResult<Headers> {
        Ok(self.0.clone())
    }
}
