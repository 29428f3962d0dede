//! Pagination controls shared by the catalog list and the versions modal

use crate::markup::{el, Element};
use crate::messages::Messages;

/// Navigation control kinds, in display order around the page label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    First,
    Previous,
    Next,
    Last,
}

impl PageControl {
    pub fn label(self, msgs: &Messages) -> &'static str {
        match self {
            PageControl::First => msgs.first,
            PageControl::Previous => msgs.previous,
            PageControl::Next => msgs.next,
            PageControl::Last => msgs.last,
        }
    }
}

/// One navigation button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub control: PageControl,
    /// Page requested when clicked
    pub target: u32,
    pub disabled: bool,
}

/// First, previous, "page X of Y", next, last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    /// Total pages as shown in the label (at least 1)
    pub total_pages: u32,
    pub buttons: [PageButton; 4],
}

impl PaginationView {
    /// Build the controls for `page` out of `total_pages`.
    ///
    /// First/previous are disabled at or before page 1; next/last at or past
    /// the last page. A server-reported total of 0 is labelled as 1.
    pub fn new(page: u32, total_pages: u32) -> Self {
        let at_start = page <= 1;
        let at_end = page >= total_pages;
        let last = total_pages.max(1);

        Self {
            page,
            total_pages: last,
            buttons: [
                PageButton {
                    control: PageControl::First,
                    target: 1,
                    disabled: at_start,
                },
                PageButton {
                    control: PageControl::Previous,
                    target: page.saturating_sub(1).max(1),
                    disabled: at_start,
                },
                PageButton {
                    control: PageControl::Next,
                    target: page.saturating_add(1).min(last),
                    disabled: at_end,
                },
                PageButton {
                    control: PageControl::Last,
                    target: last,
                    disabled: at_end,
                },
            ],
        }
    }

    pub fn button(&self, control: PageControl) -> &PageButton {
        // The array is built in PageControl order
        &self.buttons[control as usize]
    }

    pub fn label(&self, msgs: &Messages) -> String {
        msgs.page_label(self.page, self.total_pages)
    }

    /// Render the controls into a container. `data_attr` is `data-page` or `data-vpage`.
    pub fn to_element(&self, container_id: &str, data_attr: &'static str, msgs: &Messages) -> Element {
        let button = |b: &PageButton| {
            let class = if b.disabled {
                "px-3 py-1 border rounded opacity-50 cursor-not-allowed"
            } else {
                "px-3 py-1 border rounded hover:bg-gray-100"
            };
            el("button")
                .flag("disabled", b.disabled)
                .class(class)
                .attr(data_attr, b.target)
                .text(b.control.label(msgs))
        };

        el("div")
            .id(container_id)
            .child(button(self.button(PageControl::First)))
            .child(button(self.button(PageControl::Previous)))
            .child(el("span").class("px-2 text-sm").text(self.label(msgs)))
            .child(button(self.button(PageControl::Next)))
            .child(button(self.button(PageControl::Last)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_disables_everything() {
        let view = PaginationView::new(1, 1);
        assert!(view.buttons.iter().all(|b| b.disabled));
    }

    #[test]
    fn test_middle_page() {
        let view = PaginationView::new(3, 5);
        assert!(view.buttons.iter().all(|b| !b.disabled));
        assert_eq!(view.button(PageControl::First).target, 1);
        assert_eq!(view.button(PageControl::Previous).target, 2);
        assert_eq!(view.button(PageControl::Next).target, 4);
        assert_eq!(view.button(PageControl::Last).target, 5);
    }

    #[test]
    fn test_edges() {
        let first = PaginationView::new(1, 4);
        assert!(first.button(PageControl::First).disabled);
        assert!(first.button(PageControl::Previous).disabled);
        assert!(!first.button(PageControl::Next).disabled);

        let last = PaginationView::new(4, 4);
        assert!(!last.button(PageControl::Previous).disabled);
        assert!(last.button(PageControl::Next).disabled);
        assert!(last.button(PageControl::Last).disabled);
    }

    #[test]
    fn test_zero_total_pages() {
        let view = PaginationView::new(1, 0);
        assert_eq!(view.total_pages, 1);
        assert!(view.buttons.iter().all(|b| b.disabled));
        assert_eq!(view.button(PageControl::Last).target, 1);
    }

    #[test]
    fn test_markup_marks_disabled_buttons() {
        let msgs = Messages::english();
        let html = PaginationView::new(1, 2)
            .to_element("pagination", "data-page", &msgs)
            .render();
        let html = html.as_str();
        assert!(html.starts_with("<div id=\"pagination\">"));
        assert!(html.contains("<button disabled class=\"px-3 py-1 border rounded opacity-50 cursor-not-allowed\" data-page=\"1\">« First</button>"));
        assert!(html.contains("<span class=\"px-2 text-sm\">Page 1 of 2</span>"));
        assert!(html.contains("data-page=\"2\">Next ›</button>"));
    }
}
