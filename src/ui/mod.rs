//! UI modules for the desktop front end
//!
//! Each tab renders from the controller's view models and reports user input
//! as [`UiEvent`](crate::controller::UiEvent)s.

mod catalog_tab;
mod components;
mod search_tab;
mod theme;

pub use catalog_tab::render_catalog_tab;
pub use components::{escape_pressed, instructions_modal, versions_modal};
pub use search_tab::render_search_tab;
pub use theme::Theme;
