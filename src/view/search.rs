//! Search result cards and the status banner

use crate::api::{GameId, SearchHit};
use crate::markup::{el, Element};
use crate::messages::Messages;
use crate::util::prefix;

use super::ids;
use super::versions::{badge, known_region};

/// Characters of the hash shown on a result card
const HASH_PREVIEW_LEN: usize = 16;

/// One selectable search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub id: GameId,
    pub hash: String,
    pub name: String,
    pub total_versions: u32,
    pub region: Option<String>,
    pub is_hack: bool,
}

impl ResultCard {
    pub fn new(hit: &SearchHit) -> Self {
        Self {
            id: hit.id.clone(),
            hash: hit.hash.clone(),
            name: hit.name.clone(),
            total_versions: hit.total_versions,
            region: known_region(hit.primary_info.region.as_deref()),
            is_hack: hit.primary_info.is_hack,
        }
    }

    /// Games with more than one version go through the versions modal
    pub fn has_multiple_versions(&self) -> bool {
        self.total_versions > 1
    }

    /// `"N versions"`, only for games with more than one version
    pub fn versions_badge(&self, msgs: &Messages) -> Option<String> {
        self.has_multiple_versions()
            .then(|| msgs.versions_badge(self.total_versions))
    }

    pub fn hash_preview(&self) -> String {
        format!("{}...", prefix(&self.hash, HASH_PREVIEW_LEN))
    }
}

/// What the search results dropdown shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsView {
    #[default]
    Hidden,
    Cards(Vec<ResultCard>),
    NoResults,
    Error,
}

impl ResultsView {
    pub fn from_hits(hits: &[SearchHit]) -> Self {
        if hits.is_empty() {
            ResultsView::NoResults
        } else {
            ResultsView::Cards(hits.iter().map(ResultCard::new).collect())
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, ResultsView::Hidden)
    }

    pub fn cards(&self) -> &[ResultCard] {
        match self {
            ResultsView::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// The `#searchResults` dropdown
    pub fn to_element(&self, msgs: &Messages) -> Element {
        let container = el("div").id(ids::SEARCH_RESULTS);
        match self {
            ResultsView::Hidden => container.class("hidden"),
            ResultsView::NoResults => container
                .class("fade-in")
                .child(el("div").class("p-3 text-center text-gray-600 text-sm").text(msgs.no_results)),
            ResultsView::Error => container
                .class("fade-in")
                .child(el("div").class("p-3 text-center text-red-600 text-sm").text(msgs.search_error)),
            ResultsView::Cards(cards) => container
                .class("fade-in")
                .children(cards.iter().map(|c| card_element(c, msgs))),
        }
    }
}

fn card_element(card: &ResultCard, msgs: &Messages) -> Element {
    let mut header = el("div")
        .class("flex justify-between items-start mb-1")
        .child(el("h3").class("font-medium text-gray-800 text-sm").text(card.name.as_str()));
    if let Some(versions) = card.versions_badge(msgs) {
        header = header.child(badge("badge-primary", &versions));
    }

    let mut tags = el("div").class("flex flex-wrap gap-1 mb-1");
    if let Some(region) = &card.region {
        tags = tags.child(badge("badge-success", region));
    }
    if card.is_hack {
        tags = tags.child(badge("badge-warning", msgs.hack));
    }

    el("div")
        .class(&format!(
            "{} p-3 border-b border-gray-100 hover:bg-gray-50 cursor-pointer transition-colors duration-200",
            ids::CLASS_SEARCH_RESULT
        ))
        .attr(ids::DATA_GAME_ID, card.id.as_str())
        .attr(ids::DATA_HASH, card.hash.as_str())
        .attr(ids::DATA_NAME, card.name.as_str())
        .attr(ids::DATA_VERSIONS, card.total_versions)
        .child(header)
        .child(tags)
        .child(
            el("p")
                .class("text-xs text-gray-600")
                .text(format!("ID: {} | Hash: {}", card.id, card.hash_preview())),
        )
}

/// Severity of the status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusKind::Info => "status-info",
            StatusKind::Success => "status-success",
            StatusKind::Error => "status-error",
        }
    }
}

/// The status banner with its spinner
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusView {
    pub message: String,
    pub kind: StatusKind,
    pub spinner: bool,
}

impl StatusView {
    pub fn info(message: impl Into<String>, spinner: bool) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Info,
            spinner,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
            spinner: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Error,
            spinner: false,
        }
    }

    /// The banner is hidden when there is neither a message nor a spinner
    pub fn is_visible(&self) -> bool {
        self.spinner || !self.message.trim().is_empty()
    }

    /// The `#statusWrapper` region with `#spinner` and `#status`
    pub fn to_element(&self) -> Element {
        let wrapper = el("div").id(ids::STATUS_WRAPPER);
        let wrapper = if self.is_visible() { wrapper } else { wrapper.class("hidden") };

        let spinner = el("div")
            .id(ids::SPINNER)
            .class(if self.spinner { "flex" } else { "hidden" })
            .child(el("div").class("spinner"));

        let status = el("div").id(ids::STATUS);
        let status = if self.message.is_empty() {
            status
        } else {
            status.class(self.kind.css_class()).text(self.message.as_str())
        };

        wrapper.child(spinner).child(status)
    }
}
