//! Catalog list rendering

use crate::api::{GameId, GamesPage};
use crate::markup::{el, Element};
use crate::messages::Messages;
use crate::query::QueryState;

use super::ids;
use super::pagination::PaginationView;

/// One catalog row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub id: GameId,
    pub name: String,
    /// Consoles joined with ", "
    pub consoles: String,
    pub versions: u32,
}

/// What the list region currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListView {
    /// Nothing fetched yet
    #[default]
    Idle,
    Loading,
    /// Valid empty result: one placeholder, no pagination
    Empty { summary: String },
    Rows {
        summary: String,
        rows: Vec<GameRow>,
        pagination: PaginationView,
    },
    /// The fetch failed; shown inline in the list region
    Failed { message: String },
}

/// `"{total} games found[ in {console}][ for \"{q}\"]"`
pub fn summary_line(total: u64, query: &QueryState, msgs: &Messages) -> String {
    let mut summary = format!("{} {}", total, msgs.games_found);
    if !query.console.is_empty() {
        summary.push_str(&format!(" {} {}", msgs.in_console, query.console));
    }
    if !query.filter.is_empty() {
        summary.push_str(&format!(" {} \"{}\"", msgs.for_query, query.filter));
    }
    summary
}

impl ListView {
    /// Build the list view for a fetched page under `query`
    pub fn from_page(page: &GamesPage, query: &QueryState, msgs: &Messages) -> Self {
        let summary = summary_line(page.total, query, msgs);

        if page.items.is_empty() {
            return ListView::Empty { summary };
        }

        let rows = page
            .items
            .iter()
            .map(|g| GameRow {
                id: g.id.clone(),
                name: g.name.clone(),
                consoles: g.consoles.join(", "),
                versions: g.versions,
            })
            .collect();

        ListView::Rows {
            summary,
            rows,
            pagination: PaginationView::new(page.page, page.total_pages),
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            ListView::Empty { summary } | ListView::Rows { summary, .. } => Some(summary),
            _ => None,
        }
    }

    pub fn rows(&self) -> &[GameRow] {
        match self {
            ListView::Rows { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn pagination(&self) -> Option<&PaginationView> {
        match self {
            ListView::Rows { pagination, .. } => Some(pagination),
            _ => None,
        }
    }

    /// The `#summary` element
    pub fn summary_element(&self) -> Element {
        el("div").id(ids::SUMMARY).text(self.summary().unwrap_or_default())
    }

    /// The `#list` container
    pub fn list_element(&self, msgs: &Messages) -> Element {
        let list = el("div").id(ids::LIST);
        match self {
            ListView::Idle => list,
            ListView::Loading => list.child(el("div").class("py-6 text-center text-gray-500").child(spinner())),
            ListView::Empty { .. } => {
                list.child(el("div").class("py-6 text-center text-gray-500").text(msgs.no_results))
            }
            ListView::Failed { message } => list.child(
                el("div")
                    .class("bg-red-50 border border-red-200 text-red-800 p-4 rounded-lg text-center")
                    .text(message.as_str()),
            ),
            ListView::Rows { rows, .. } => list.children(rows.iter().map(|r| row_element(r, msgs))),
        }
    }

    /// The `#pagination` container; empty unless there are rows
    pub fn pagination_element(&self, msgs: &Messages) -> Element {
        match self.pagination() {
            Some(p) => p.to_element(ids::PAGINATION, ids::DATA_PAGE, msgs),
            None => el("div").id(ids::PAGINATION),
        }
    }
}

fn spinner() -> Element {
    el("div").class("spinner mx-auto")
}

fn row_element(row: &GameRow, msgs: &Messages) -> Element {
    el("div")
        .class("py-3 flex flex-col md:flex-row md:items-center md:justify-between gap-2")
        .child(
            el("div")
                .child(el("div").class("font-medium text-gray-800").text(row.name.as_str()))
                .child(el("div").class("text-xs text-gray-500").text(format!(
                    "{}: {} • {}: {}",
                    msgs.consoles, row.consoles, msgs.versions, row.versions
                ))),
        )
        .child(
            el("div").class("text-right").child(
                el("button")
                    .attr("type", "button")
                    .class("px-3 py-1 border rounded hover:bg-gray-100 text-gray-700")
                    .attr(ids::DATA_ACTION, "versions")
                    .attr(ids::DATA_GAME_ID, row.id.as_str())
                    .attr(ids::DATA_NAME, row.name.as_str())
                    .text(msgs.action),
            ),
        )
}
