//! Versions modal rendering and its local pagination cursor

use crate::api::GameVersion;
use crate::markup::{el, Element};
use crate::messages::Messages;

use super::ids;
use super::pagination::PaginationView;

/// Default number of versions per modal page
pub const DEFAULT_VERSIONS_PAGE_SIZE: usize = 10;

/// Client-side pagination over an already-fetched, server-ranked version list
#[derive(Debug, Clone)]
pub struct VersionsCursor {
    all: Vec<GameVersion>,
    page: u32,
    page_size: usize,
}

impl VersionsCursor {
    pub fn new(all: Vec<GameVersion>, page_size: usize) -> Self {
        Self {
            all,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn total_pages(&self) -> u32 {
        self.all.len().div_ceil(self.page_size).max(1) as u32
    }

    /// Current page, clamped to the available range
    pub fn page(&self) -> u32 {
        self.page.clamp(1, self.total_pages())
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.total_pages());
    }

    /// Index into the full list of the first entry on the current page
    pub fn start(&self) -> usize {
        (self.page() as usize - 1) * self.page_size
    }

    /// `(global index, version)` pairs of the current page
    pub fn current(&self) -> impl Iterator<Item = (usize, &GameVersion)> {
        self.all
            .iter()
            .enumerate()
            .skip(self.start())
            .take(self.page_size)
    }

    /// Version by global index (server order)
    pub fn get(&self, index: usize) -> Option<&GameVersion> {
        self.all.get(index)
    }
}

/// One selectable version entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCard {
    /// Position in server order
    pub index: usize,
    pub hash: String,
    pub title: String,
    /// Region badge, omitted when unknown
    pub region: Option<String>,
    pub is_hack: bool,
    pub is_translation: bool,
    /// First entry in server order
    pub recommended: bool,
}

impl VersionCard {
    fn new(index: usize, version: &GameVersion) -> Self {
        Self {
            index,
            hash: version.hash.clone(),
            title: version.title().to_string(),
            region: known_region(version.info.region.as_deref()),
            is_hack: version.info.is_hack,
            is_translation: version.info.is_translation,
            recommended: index == 0,
        }
    }
}

/// A region worth a badge: present, non-empty, not "Unknown"
pub fn known_region(region: Option<&str>) -> Option<String> {
    region
        .filter(|r| !r.is_empty() && *r != "Unknown")
        .map(str::to_string)
}

/// Body of the versions modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionsBody {
    /// Spinner placeholder while the list is fetched
    Loading,
    Cards {
        cards: Vec<VersionCard>,
        pagination: PaginationView,
    },
    /// Inline error; the modal stays open
    Error(String),
}

/// Everything the versions modal shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionsView {
    pub game_name: String,
    pub body: VersionsBody,
}

impl VersionsView {
    pub fn loading(game_name: &str) -> Self {
        Self {
            game_name: game_name.to_string(),
            body: VersionsBody::Loading,
        }
    }

    pub fn error(game_name: &str, message: impl Into<String>) -> Self {
        Self {
            game_name: game_name.to_string(),
            body: VersionsBody::Error(message.into()),
        }
    }

    /// Cards for the cursor's current page
    pub fn page(game_name: &str, cursor: &VersionsCursor) -> Self {
        let cards = cursor.current().map(|(i, v)| VersionCard::new(i, v)).collect();
        Self {
            game_name: game_name.to_string(),
            body: VersionsBody::Cards {
                cards,
                pagination: PaginationView::new(cursor.page(), cursor.total_pages()),
            },
        }
    }

    pub fn cards(&self) -> &[VersionCard] {
        match &self.body {
            VersionsBody::Cards { cards, .. } => cards,
            _ => &[],
        }
    }

    /// `"Versions of: {name}"`
    pub fn heading(&self, msgs: &Messages) -> String {
        format!("{} {}", msgs.versions_of, self.game_name)
    }

    pub fn label_element(&self, msgs: &Messages) -> Element {
        el("h3")
            .id(ids::VERSIONS_MODAL_LABEL)
            .child(el("span").class("text-3xl").text("🎮"))
            .text(format!(" {}", self.heading(msgs)))
    }

    /// The `#versionsContainer` region
    pub fn container_element(&self, msgs: &Messages) -> Element {
        let container = el("div").id(ids::VERSIONS_CONTAINER);
        match &self.body {
            VersionsBody::Loading => container.child(
                el("div")
                    .class("text-center py-8")
                    .child(el("div").class("spinner mx-auto mb-4"))
                    .child(el("p").class("text-gray-600").text(msgs.loading_versions)),
            ),
            VersionsBody::Error(message) => container.child(
                el("div")
                    .class("bg-red-50 border border-red-200 text-red-800 p-4 rounded-lg text-center")
                    .child(el("span").class("text-2xl").text("⚠️"))
                    .child(el("p").class("mt-2").text(message.as_str())),
            ),
            VersionsBody::Cards { cards, .. } => {
                container.children(cards.iter().map(|c| card_element(c, msgs)))
            }
        }
    }

    /// The `#versionsPagination` region; empty unless cards are shown
    pub fn pagination_element(&self, msgs: &Messages) -> Element {
        match &self.body {
            VersionsBody::Cards { pagination, .. } => {
                pagination.to_element(ids::VERSIONS_PAGINATION, ids::DATA_VPAGE, msgs)
            }
            _ => el("div").id(ids::VERSIONS_PAGINATION),
        }
    }
}

fn card_element(card: &VersionCard, msgs: &Messages) -> Element {
    let border = if card.recommended {
        "border-green-500 bg-green-50"
    } else {
        "border-gray-200"
    };

    let mut header = el("div")
        .class("flex justify-between items-start mb-1")
        .child(el("h4").class("font-medium text-gray-800 text-sm").text(card.title.as_str()));
    if card.recommended {
        header = header.child(badge("badge-success", &format!("✅ {}", msgs.recommended)));
    }

    let mut tags = el("div").class("flex flex-wrap gap-1 mb-1");
    if let Some(region) = &card.region {
        tags = tags.child(badge("badge-success", region));
    }
    if card.is_hack {
        tags = tags.child(badge("badge-warning", msgs.hack));
    }
    if card.is_translation {
        tags = tags.child(badge("badge-warning", msgs.translation));
    }

    el("div")
        .class(&format!(
            "{} border {} rounded-lg p-3 hover:shadow-md transition-all duration-300 cursor-pointer",
            ids::CLASS_VERSION_OPTION,
            border
        ))
        .attr(ids::DATA_HASH, card.hash.as_str())
        .child(header)
        .child(tags)
        .child(el("p").class("text-xs text-gray-600").text(format!("Hash: {}", card.hash)))
}

pub(super) fn badge(kind: &str, text: &str) -> Element {
    el("span").class(&format!("{kind} text-xs")).text(text)
}
