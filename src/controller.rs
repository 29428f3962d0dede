//! The catalog controller.
//!
//! One [`Controller`] owns every piece of UI state: the catalog query and
//! list, the versions modal, the search area, the download status and modal
//! visibility. Front ends feed it [`UiEvent`]s, call [`Controller::poll`] every
//! frame, and perform the [`StateEvent`]s it hands back.

use std::time::{Duration, Instant};

use crate::api::{CatalogBackend, GameId};
use crate::config::{Config, RowAction, VersionPick};
use crate::messages::Messages;
use crate::modal::{ModalId, Modals};
use crate::state::{CatalogState, DownloadState, SearchMode, SearchState, StateEvent, VersionsState};
use crate::util::is_valid_hash;
use crate::view::StatusView;

/// Vertical scroll offset past which the scroll-to-top control is shown
pub const SCROLL_TOP_THRESHOLD: f32 = 300.0;

/// Behavior switches and tuning, usually taken from [`Config`]
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub row_action: RowAction,
    pub on_select: VersionPick,
    pub page_size: u32,
    pub versions_page_size: usize,
    pub debounce: Duration,
    pub min_chars: usize,
    pub validate_hash: bool,
    pub completion_delay: Duration,
    pub locale: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            row_action: config.catalog.row_action,
            on_select: config.versions.on_select,
            page_size: config.catalog.page_size,
            versions_page_size: config.versions.page_size,
            debounce: config.search.debounce(),
            min_chars: config.search.min_chars,
            validate_hash: config.search.validate_hash,
            completion_delay: config.download.completion_delay(),
            locale: config.ui.locale.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// User input routed to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FilterInput(String),
    ConsoleSelected(String),
    PageSizeSelected(u32),
    PageClicked(u32),
    /// Action control of the catalog row at this position
    RowActivated(usize),
    SearchModeSelected(SearchMode),
    NameInput(String),
    /// Search result card at this position
    ResultPicked(usize),
    ClickedOutsideSearch,
    HashSubmitted(String),
    VersionsPageClicked(u32),
    /// Version at this position in server order
    VersionPicked(usize),
    OpenModal(ModalId),
    CloseModal(ModalId),
    /// Click on the dimmed area around a modal
    BackdropClicked(ModalId),
    KeyPressed(Key),
    Scrolled(f32),
    ScrollTopClicked,
}

pub struct Controller<B: CatalogBackend> {
    backend: B,
    options: ControllerOptions,
    msgs: Messages,
    pub catalog: CatalogState,
    pub versions: VersionsState,
    pub search: SearchState,
    pub download: DownloadState,
    pub modals: Modals,
    scroll_offset: f32,
    events: Vec<StateEvent>,
}

impl<B: CatalogBackend> Controller<B> {
    pub fn new(backend: B, options: ControllerOptions) -> Self {
        Self {
            msgs: Messages::for_locale(&options.locale),
            catalog: CatalogState::new(options.page_size, options.debounce),
            versions: VersionsState::new(options.versions_page_size),
            search: SearchState::new(options.debounce, options.min_chars),
            download: DownloadState::new(options.completion_delay),
            modals: Modals::default(),
            scroll_offset: 0.0,
            events: Vec::new(),
            backend,
            options,
        }
    }

    pub fn messages(&self) -> &Messages {
        &self.msgs
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Load the first catalog page
    pub fn start(&mut self) {
        self.catalog.fetch(&self.backend);
    }

    /// Apply one user input
    pub fn handle(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::FilterInput(text) => self.catalog.input_filter(&text, now),
            UiEvent::ConsoleSelected(console) => self.catalog.set_console(&console, &self.backend),
            UiEvent::PageSizeSelected(size) => self.catalog.set_page_size(size, &self.backend),
            UiEvent::PageClicked(page) => self.catalog.set_page(page, &self.backend),
            UiEvent::RowActivated(index) => self.activate_row(index),
            UiEvent::SearchModeSelected(mode) => self.set_search_mode(mode),
            UiEvent::NameInput(text) => self.search.input_name(&text, now),
            UiEvent::ResultPicked(index) => self.pick_result(index),
            UiEvent::ClickedOutsideSearch => self.search.hide_results(),
            UiEvent::HashSubmitted(hash) => self.submit_hash(&hash),
            UiEvent::VersionsPageClicked(page) => self.versions.set_page(page),
            UiEvent::VersionPicked(index) => self.pick_version(index),
            UiEvent::OpenModal(id) => self.modals.open(id),
            UiEvent::CloseModal(id) | UiEvent::BackdropClicked(id) => self.close_modal(id),
            UiEvent::KeyPressed(Key::Escape) => self.close_all_modals(),
            UiEvent::KeyPressed(Key::Other) => {}
            UiEvent::Scrolled(offset) => self.scroll_offset = offset,
            UiEvent::ScrollTopClicked => {
                self.scroll_offset = 0.0;
                self.events.push(StateEvent::ScrollToTop);
            }
        }
    }

    /// Fire due debounces and collect finished requests
    pub fn poll(&mut self, now: Instant) {
        self.catalog.poll_debounce(now, &self.backend);
        self.search.poll_debounce(now, &self.backend);

        self.catalog.poll(&self.msgs);
        self.versions.poll(&self.msgs);
        self.search.poll();
        let events = self.download.poll(&self.msgs);
        self.events.extend(events);
    }

    /// Earliest instant a pending debounce becomes due
    pub fn next_wakeup(&self) -> Option<Instant> {
        [self.catalog.next_deadline(), self.search.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Whether any request is outstanding
    pub fn is_busy(&self) -> bool {
        self.catalog.is_loading() || self.versions.is_loading() || self.search.is_searching() || self.download.is_busy()
    }

    /// Side effects queued since the last call
    pub fn take_events(&mut self) -> Vec<StateEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn show_scroll_top(&self) -> bool {
        self.scroll_offset > SCROLL_TOP_THRESHOLD
    }

    pub fn scroll_locked(&self) -> bool {
        self.modals.scroll_locked()
    }

    pub fn set_filter(&mut self, text: &str) {
        self.catalog.set_filter(text, &self.backend);
    }

    pub fn set_console(&mut self, console: &str) {
        self.catalog.set_console(console, &self.backend);
    }

    pub fn set_page(&mut self, page: u32) {
        self.catalog.set_page(page, &self.backend);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.catalog.set_page_size(page_size, &self.backend);
    }

    /// Open the versions modal for a game and fetch its versions
    pub fn open_versions(&mut self, game_id: GameId, name: &str) {
        self.modals.open(ModalId::Versions);
        self.versions.request(game_id, name, &self.backend);
    }

    fn activate_row(&mut self, index: usize) {
        let Some(row) = self.catalog.view.rows().get(index).cloned() else {
            return;
        };
        match self.options.row_action {
            RowAction::Versions => self.open_versions(row.id, &row.name),
            RowAction::Notice => {
                let notice = format!("{}: {}", row.name, self.msgs.versions_badge(row.versions));
                self.download.set_status(StatusView::info(notice, false));
            }
        }
    }

    /// Download a version from the modal. No confirmation is asked.
    pub fn pick_version(&mut self, index: usize) {
        let Some(hash) = self.versions.version(index).map(|v| v.hash.clone()) else {
            return;
        };
        self.close_modal(ModalId::Versions);

        match self.options.on_select {
            VersionPick::Redirect => match self.backend.download_page_url(&hash) {
                Ok(url) => self.events.push(StateEvent::Navigate(url)),
                Err(e) => {
                    tracing::error!("Cannot build download URL for {}: {}", hash, e);
                    self.download.set_status(StatusView::error(self.msgs.search_game_error));
                }
            },
            VersionPick::Resolve => self.download.start(&hash, &self.backend, &self.msgs),
        }
    }

    /// Take a search hit: several versions go through the modal, one downloads now
    pub fn pick_result(&mut self, index: usize) {
        let Some(card) = self.search.pick(index) else {
            return;
        };
        if card.has_multiple_versions() {
            self.open_versions(card.id, &card.name);
        } else {
            self.download.start(&card.hash, &self.backend, &self.msgs);
        }
    }

    pub fn submit_hash(&mut self, input: &str) {
        self.search.hash_input = input.to_string();
        let hash = input.trim();
        if hash.is_empty() {
            return;
        }
        if self.options.validate_hash && !is_valid_hash(hash) {
            self.download.set_status(StatusView::error(self.msgs.invalid_hash));
            return;
        }
        self.download.start(hash, &self.backend, &self.msgs);
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search.set_mode(mode);
        self.download.clear_status();
    }

    pub fn close_modal(&mut self, id: ModalId) {
        self.modals.close(id);
        if id == ModalId::Versions {
            self.versions.reset();
        }
    }

    pub fn close_all_modals(&mut self) {
        self.modals.close_all();
        self.versions.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hit, settle, versions, Call, MockBackend};
    use crate::state::DownloadPhase;
    use crate::view::{ListView, StatusKind, VersionsBody};

    fn controller(backend: &MockBackend) -> Controller<MockBackend> {
        let options = ControllerOptions {
            completion_delay: Duration::ZERO,
            ..Default::default()
        };
        Controller::new(backend.clone(), options)
    }

    async fn settle_all(ctl: &mut Controller<MockBackend>) {
        settle(ctl, |c| {
            c.poll(Instant::now());
            c.is_busy()
        })
        .await;
    }

    async fn search_for(ctl: &mut Controller<MockBackend>, term: &str) {
        let now = Instant::now();
        ctl.handle(UiEvent::NameInput(term.to_string()), now);
        ctl.poll(now + Duration::from_millis(300));
        settle_all(ctl).await;
    }

    #[tokio::test]
    async fn test_single_version_hit_downloads_directly() {
        let backend = MockBackend::default();
        backend.set_hits(vec![hit("5", "Tetris", 1)]);
        backend.set_download_url("https://files.example/tetris.zip");
        let mut ctl = controller(&backend);

        search_for(&mut ctl, "tetris").await;
        ctl.handle(UiEvent::ResultPicked(0), Instant::now());
        settle_all(&mut ctl).await;

        assert!(!ctl.modals.is_open(ModalId::Versions));
        assert_eq!(backend.versions_calls(), 0);
        assert_eq!(backend.resolve_calls(), 1);
        assert_eq!(ctl.search.name_input, "Tetris");
        assert_eq!(
            ctl.take_events(),
            vec![StateEvent::OpenUrl("https://files.example/tetris.zip".to_string())]
        );
    }

    #[tokio::test]
    async fn test_multi_version_hit_opens_versions_modal() {
        let backend = MockBackend::default();
        backend.set_hits(vec![hit("8", "Mega Man", 3)]);
        backend.set_versions("8", versions(3));
        let mut ctl = controller(&backend);

        search_for(&mut ctl, "mega").await;
        ctl.handle(UiEvent::ResultPicked(0), Instant::now());
        assert!(ctl.modals.is_open(ModalId::Versions));
        assert!(ctl.scroll_locked());
        settle_all(&mut ctl).await;

        let view = ctl.versions.view().expect("versions view");
        assert_eq!(view.game_name, "Mega Man");
        assert_eq!(view.cards().len(), 3);
        assert_eq!(backend.resolve_calls(), 0);
    }

    #[tokio::test]
    async fn test_version_pick_redirects_by_default() {
        let backend = MockBackend::default();
        backend.set_versions("8", versions(3));
        let mut ctl = controller(&backend);

        ctl.open_versions(GameId::new("8"), "Mega Man");
        settle_all(&mut ctl).await;
        ctl.handle(UiEvent::VersionPicked(2), Instant::now());

        assert!(!ctl.modals.is_open(ModalId::Versions));
        assert_eq!(
            ctl.take_events(),
            vec![StateEvent::Navigate("http://catalog.test/dl?hash=HASH0002".to_string())]
        );
    }

    #[tokio::test]
    async fn test_version_pick_can_resolve() {
        let backend = MockBackend::default();
        backend.set_versions("8", versions(3));
        backend.set_download_url("https://files.example/mm.zip");
        let options = ControllerOptions {
            on_select: VersionPick::Resolve,
            completion_delay: Duration::ZERO,
            ..Default::default()
        };
        let mut ctl = Controller::new(backend.clone(), options);

        ctl.open_versions(GameId::new("8"), "Mega Man");
        settle_all(&mut ctl).await;
        ctl.pick_version(0);
        settle_all(&mut ctl).await;

        assert!(backend.calls().contains(&Call::ResolveDownload("HASH0000".to_string())));
        assert_eq!(
            ctl.take_events(),
            vec![StateEvent::OpenUrl("https://files.example/mm.zip".to_string())]
        );
    }

    #[tokio::test]
    async fn test_escape_closes_all_modals() {
        let backend = MockBackend::default();
        let mut ctl = controller(&backend);
        ctl.handle(UiEvent::OpenModal(ModalId::Instructions), Instant::now());
        ctl.open_versions(GameId::new("1"), "Zelda");
        assert!(ctl.scroll_locked());

        ctl.handle(UiEvent::KeyPressed(Key::Other), Instant::now());
        assert!(ctl.modals.any_open());

        ctl.handle(UiEvent::KeyPressed(Key::Escape), Instant::now());
        assert!(!ctl.modals.any_open());
        assert!(!ctl.scroll_locked());
        assert!(ctl.versions.view().is_none());
    }

    #[tokio::test]
    async fn test_backdrop_click_closes_that_modal() {
        let backend = MockBackend::default();
        let mut ctl = controller(&backend);
        ctl.handle(UiEvent::OpenModal(ModalId::Instructions), Instant::now());
        ctl.handle(UiEvent::BackdropClicked(ModalId::Instructions), Instant::now());
        assert!(!ctl.scroll_locked());
    }

    #[tokio::test]
    async fn test_keystrokes_fire_one_search() {
        let backend = MockBackend::default();
        let mut ctl = controller(&backend);
        let t0 = Instant::now();

        for (i, text) in ["me", "meg", "mega", "megam"].iter().enumerate() {
            let at = t0 + Duration::from_millis(90 * i as u64);
            ctl.handle(UiEvent::NameInput(text.to_string()), at);
            ctl.poll(at);
        }
        let last = t0 + Duration::from_millis(270);
        assert_eq!(ctl.next_wakeup(), Some(last + Duration::from_millis(300)));

        ctl.poll(last + Duration::from_millis(299));
        assert_eq!(backend.search_calls(), 0);
        ctl.poll(last + Duration::from_millis(300));
        settle_all(&mut ctl).await;

        assert_eq!(backend.calls(), vec![Call::SearchGames("megam".to_string())]);
        assert_eq!(ctl.next_wakeup(), None);
    }

    #[tokio::test]
    async fn test_stale_listing_never_overwrites_newer() {
        let backend = MockBackend::with_games(&["Zelda"]);
        let release_old = backend.hold_listing("old");
        let mut ctl = controller(&backend);

        ctl.set_filter("old");
        ctl.set_filter("new");
        settle_all(&mut ctl).await;
        assert_eq!(ctl.catalog.view.summary(), Some("1 games found for \"new\""));

        let _ = release_old.send(());
        tokio::time::sleep(Duration::from_millis(5)).await;
        ctl.poll(Instant::now());
        assert_eq!(ctl.catalog.view.summary(), Some("1 games found for \"new\""));
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_row_action_notice() {
        let backend = MockBackend::with_games(&["Zelda"]);
        let options = ControllerOptions {
            row_action: RowAction::Notice,
            ..Default::default()
        };
        let mut ctl = Controller::new(backend.clone(), options);
        ctl.start();
        settle_all(&mut ctl).await;
        assert!(matches!(ctl.catalog.view, ListView::Rows { .. }));

        ctl.handle(UiEvent::RowActivated(0), Instant::now());
        assert!(!ctl.modals.any_open());
        assert_eq!(ctl.download.status.message, "Zelda: 2 versions");
        assert_eq!(backend.versions_calls(), 0);
    }

    #[tokio::test]
    async fn test_row_action_opens_versions() {
        let backend = MockBackend::with_games(&["Zelda"]);
        let mut ctl = controller(&backend);
        ctl.start();
        settle_all(&mut ctl).await;

        ctl.handle(UiEvent::RowActivated(0), Instant::now());
        assert!(ctl.modals.is_open(ModalId::Versions));
        settle_all(&mut ctl).await;
        assert!(matches!(
            ctl.versions.view().map(|v| v.body),
            Some(VersionsBody::Error(_))
        ));
        assert!(ctl.modals.is_open(ModalId::Versions));
    }

    #[tokio::test]
    async fn test_hash_submission() {
        let backend = MockBackend::default();
        let options = ControllerOptions {
            validate_hash: true,
            completion_delay: Duration::ZERO,
            ..Default::default()
        };
        let mut ctl = Controller::new(backend.clone(), options);

        ctl.handle(UiEvent::HashSubmitted("   ".to_string()), Instant::now());
        assert!(!ctl.download.status.is_visible());

        ctl.handle(UiEvent::HashSubmitted("not-a-hash".to_string()), Instant::now());
        assert_eq!(ctl.download.status.kind, StatusKind::Error);
        assert_eq!(ctl.download.status.message, ctl.messages().invalid_hash);
        assert_eq!(backend.resolve_calls(), 0);

        ctl.handle(UiEvent::HashSubmitted(" DEADBEEF ".to_string()), Instant::now());
        settle_all(&mut ctl).await;
        assert_eq!(backend.calls(), vec![Call::ResolveDownload("DEADBEEF".to_string())]);
    }

    #[tokio::test]
    async fn test_mode_switch_clears_status() {
        let backend = MockBackend::default();
        let mut ctl = controller(&backend);
        ctl.download.set_status(StatusView::error("Boom"));
        ctl.handle(UiEvent::SearchModeSelected(SearchMode::Hash), Instant::now());
        assert!(!ctl.download.status.is_visible());
        assert_eq!(ctl.search.mode, SearchMode::Hash);
    }

    #[tokio::test]
    async fn test_mode_switch_keeps_pending_download() {
        let backend = MockBackend::default();
        backend.set_download_url("https://files.example/rom.zip");
        let options = ControllerOptions {
            completion_delay: Duration::ZERO,
            ..Default::default()
        };
        let mut ctl = Controller::new(backend.clone(), options);
        ctl.set_search_mode(SearchMode::Hash);

        ctl.handle(UiEvent::HashSubmitted("DEADBEEF".to_string()), Instant::now());
        ctl.handle(UiEvent::SearchModeSelected(SearchMode::Name), Instant::now());
        settle_all(&mut ctl).await;

        assert_eq!(
            ctl.take_events(),
            vec![StateEvent::OpenUrl("https://files.example/rom.zip".to_string())]
        );
        assert_eq!(ctl.download.phase, DownloadPhase::Downloaded);
        assert!(ctl.download.status.is_visible());
    }

    #[test]
    fn test_scroll_top_threshold() {
        let backend = MockBackend::default();
        let mut ctl = controller(&backend);
        let now = Instant::now();

        ctl.handle(UiEvent::Scrolled(300.0), now);
        assert!(!ctl.show_scroll_top());
        ctl.handle(UiEvent::Scrolled(301.0), now);
        assert!(ctl.show_scroll_top());

        ctl.handle(UiEvent::ScrollTopClicked, now);
        assert!(!ctl.show_scroll_top());
        assert_eq!(ctl.take_events(), vec![StateEvent::ScrollToTop]);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.ui.locale = "es-MX".to_string();
        config.catalog.row_action = RowAction::Notice;
        let ctl = Controller::new(MockBackend::default(), ControllerOptions::from_config(&config));
        assert_eq!(ctl.messages().games_found, Messages::spanish().games_found);
        assert_eq!(ctl.options().row_action, RowAction::Notice);
    }
}
