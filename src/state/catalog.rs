//! Catalog listing state: query, debounced filter input, and the current page

use std::time::{Duration, Instant};

use crate::api::{ApiError, CatalogBackend, GamesPage};
use crate::debounce::Debouncer;
use crate::messages::Messages;
use crate::query::QueryState;
use crate::task::{LatestTask, PollResult};
use crate::view::ListView;

type ListResult = (QueryState, Result<GamesPage, ApiError>);

/// Catalog listing state
pub struct CatalogState {
    /// Query the next fetch will use
    query: QueryState,
    /// Contents of the filter text box
    pub filter_input: String,
    filter_debounce: Debouncer<String>,
    task: LatestTask<ListResult>,
    /// What the list region shows
    pub view: ListView,
}

impl CatalogState {
    pub fn new(page_size: u32, debounce: Duration) -> Self {
        Self {
            query: QueryState::with_page_size(page_size),
            filter_input: String::new(),
            filter_debounce: Debouncer::new(debounce),
            task: LatestTask::default(),
            view: ListView::Idle,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_pending()
    }

    /// When the pending filter input becomes due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.filter_debounce.deadline()
    }

    /// Record a keystroke in the filter box; the fetch waits for the quiet period
    pub fn input_filter(&mut self, text: &str, now: Instant) {
        self.filter_input = text.to_string();
        self.filter_debounce.push(text.to_string(), now);
    }

    /// Apply the debounced filter once its quiet period has elapsed.
    /// Returns true when a fetch was issued.
    pub fn poll_debounce<B: CatalogBackend>(&mut self, now: Instant, backend: &B) -> bool {
        match self.filter_debounce.poll(now) {
            Some(text) => {
                tracing::debug!("Filter settled on {:?}", text);
                self.set_filter(&text, backend);
                true
            }
            None => false,
        }
    }

    pub fn set_filter<B: CatalogBackend>(&mut self, text: &str, backend: &B) {
        self.query.set_filter(text);
        self.fetch(backend);
    }

    pub fn set_console<B: CatalogBackend>(&mut self, console: &str, backend: &B) {
        self.query.set_console(console);
        self.fetch(backend);
    }

    pub fn set_page<B: CatalogBackend>(&mut self, page: u32, backend: &B) {
        self.query.set_page(page);
        self.fetch(backend);
    }

    pub fn set_page_size<B: CatalogBackend>(&mut self, page_size: u32, backend: &B) {
        self.query.set_page_size(page_size);
        self.fetch(backend);
    }

    /// Issue one request for the current query snapshot
    pub fn fetch<B: CatalogBackend>(&mut self, backend: &B) {
        let query = self.query.clone();
        let backend = backend.clone();
        let token = self.task.spawn(async move {
            let result = backend.list_games(&query).await;
            (query, result)
        });
        tracing::debug!("Catalog request {} ({})", token, self.query.query_string());

        if matches!(self.view, ListView::Idle) {
            self.view = ListView::Loading;
        }
    }

    /// Poll the in-flight listing request and rebuild the view when it lands
    pub fn poll(&mut self, msgs: &Messages) {
        match self.task.poll() {
            PollResult::Complete(Ok((query, Ok(page)))) => {
                self.view = ListView::from_page(&page, &query, msgs);
            }
            PollResult::Complete(Ok((query, Err(e)))) => {
                tracing::warn!("Failed to fetch catalog ({}): {}", query.query_string(), e);
                self.view = ListView::Failed {
                    message: msgs.list_error.to_string(),
                };
            }
            PollResult::Complete(Err(e)) => {
                tracing::error!("Catalog task panicked: {}", e);
                self.view = ListView::Failed {
                    message: msgs.list_error.to_string(),
                };
            }
            PollResult::Pending | PollResult::NoTask => {}
        }
    }
}
