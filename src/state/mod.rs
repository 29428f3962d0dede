//! Controller state modules
//!
//! Each region of the UI owns its state struct, its in-flight request and a
//! poll method. Poll methods hand side effects back as [`StateEvent`]s
//! instead of performing them.

mod catalog;
mod download;
mod search;
mod versions;

pub use catalog::CatalogState;
pub use download::{DownloadPhase, DownloadState};
pub use search::{SearchMode, SearchState};
pub use versions::{VersionsPhase, VersionsState};

/// Side effects requested by the controller, performed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// Navigate the current context to a URL (direct-download redirect)
    Navigate(String),

    /// Open a resolved download URL in a new context
    OpenUrl(String),

    /// Scroll the page back to the top
    ScrollToTop,
}
