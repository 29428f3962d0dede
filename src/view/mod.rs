//! Render layer: view models built from controller state, and their markup.
//!
//! Each view model is toolkit-agnostic. The desktop UI draws them with egui;
//! `to_element`/`*_element` produce escaped markup targeting the page
//! template's element ids (see [`ids`]).

pub mod ids;
mod list;
mod pagination;
mod search;
mod versions;

pub use list::{summary_line, GameRow, ListView};
pub use pagination::{PageButton, PageControl, PaginationView};
pub use search::{ResultCard, ResultsView, StatusKind, StatusView};
pub use versions::{
    known_region, VersionCard, VersionsBody, VersionsCursor, VersionsView, DEFAULT_VERSIONS_PAGE_SIZE,
};
