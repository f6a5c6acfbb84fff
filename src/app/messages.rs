//! AppMessage enum for async results flowing back into the event loop.

use crate::auth::CallOutcome;
use crate::error::ShellResult;
use crate::pages::PageContent;

/// Results of spawned work, applied in arrival order.
#[derive(Debug)]
pub enum AppMessage {
    /// An identity provider call finished.
    AuthResolved { id: u64, outcome: CallOutcome },
    /// A page fetch finished.
    PageLoaded {
        path: String,
        generation: u64,
        outcome: ShellResult<PageContent>,
    },
}
