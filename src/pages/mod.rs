//! Page components.
//!
//! Pages are thin: each one asks the API client for a listing and hands the
//! result to the renderer. They never touch tokens; a missing session shows
//! up as an error the app routes back to the authentication gate.

mod kind;
mod resource;

pub use kind::{PageKind, ResourceKind};
pub use resource::{cell_text, fetch_page, PageContent, PageState, PageStore, ResourceTable};
