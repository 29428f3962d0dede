//! Direct search state: input mode, debounced name search and its results

use std::time::{Duration, Instant};

use crate::api::{ApiError, CatalogBackend, SearchHit};
use crate::debounce::Debouncer;
use crate::task::{LatestTask, PollResult};
use crate::view::{ResultCard, ResultsView};

/// Which search form is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Name,
    Hash,
}

/// Search area state
pub struct SearchState {
    pub mode: SearchMode,
    /// Contents of the `gameName` field
    pub name_input: String,
    /// Contents of the `searchTerm` field
    pub hash_input: String,
    debounce: Debouncer<String>,
    min_chars: usize,
    task: LatestTask<Result<Vec<SearchHit>, ApiError>>,
    pub results: ResultsView,
}

impl SearchState {
    pub fn new(debounce: Duration, min_chars: usize) -> Self {
        Self {
            mode: SearchMode::Name,
            name_input: String::new(),
            hash_input: String::new(),
            debounce: Debouncer::new(debounce),
            min_chars,
            task: LatestTask::default(),
            results: ResultsView::Hidden,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.task.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Record a keystroke in the name field.
    ///
    /// Input shorter than the minimum cancels any pending search and hides
    /// the results.
    pub fn input_name(&mut self, text: &str, now: Instant) {
        self.name_input = text.to_string();
        let term = text.trim();
        if term.chars().count() < self.min_chars {
            self.debounce.cancel();
            self.task.clear();
            self.results = ResultsView::Hidden;
            return;
        }
        self.debounce.push(term.to_string(), now);
    }

    /// Issue the debounced search once the quiet period has elapsed.
    /// Returns true when a request was issued.
    pub fn poll_debounce<B: CatalogBackend>(&mut self, now: Instant, backend: &B) -> bool {
        match self.debounce.poll(now) {
            Some(term) => {
                tracing::debug!("Search input settled on {:?}", term);
                self.search(&term, backend);
                true
            }
            None => false,
        }
    }

    /// Search by name immediately
    pub fn search<B: CatalogBackend>(&mut self, term: &str, backend: &B) {
        let backend = backend.clone();
        let term = term.to_string();
        self.task.spawn(async move { backend.search_games(&term).await });
    }

    /// Poll the in-flight search and refresh the results dropdown
    pub fn poll(&mut self) {
        self.results = match self.task.poll() {
            PollResult::Complete(Ok(Ok(hits))) => ResultsView::from_hits(&hits),
            PollResult::Complete(Ok(Err(ApiError::Unsuccessful(_)))) => ResultsView::NoResults,
            PollResult::Complete(Ok(Err(e))) => {
                tracing::warn!("Name search failed: {}", e);
                ResultsView::Error
            }
            PollResult::Complete(Err(e)) => {
                tracing::error!("Search task panicked: {}", e);
                ResultsView::Error
            }
            PollResult::Pending | PollResult::NoTask => return,
        };
    }

    /// Take a hit from the dropdown: hide results and copy its name into the field
    pub fn pick(&mut self, index: usize) -> Option<ResultCard> {
        let card = self.results.cards().get(index).cloned()?;
        self.debounce.cancel();
        self.task.clear();
        self.results = ResultsView::Hidden;
        self.name_input = card.name.clone();
        Some(card)
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.hide_results();
    }

    pub fn hide_results(&mut self) {
        self.results = ResultsView::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hit, settle, MockBackend};

    fn state() -> SearchState {
        SearchState::new(Duration::from_millis(300), 2)
    }

    #[tokio::test]
    async fn test_short_input_cancels_pending_search() {
        let backend = MockBackend::default();
        let mut search = state();
        let t0 = Instant::now();

        search.input_name("ma", t0);
        assert!(search.next_deadline().is_some());
        search.input_name(" m ", t0 + Duration::from_millis(50));
        assert!(search.next_deadline().is_none());
        assert!(!search.poll_debounce(t0 + Duration::from_secs(1), &backend));
        assert_eq!(search.results, ResultsView::Hidden);
        assert_eq!(backend.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_results_and_failures() {
        let backend = MockBackend::default();
        backend.set_hits(vec![hit("1", "Mario", 1), hit("2", "Mario 2", 4)]);
        let mut search = state();

        search.search("mario", &backend);
        settle(&mut search, |s| {
            s.poll();
            s.is_searching()
        })
        .await;
        assert_eq!(search.results.cards().len(), 2);

        backend.set_hits(Vec::new());
        search.search("zzz", &backend);
        settle(&mut search, |s| {
            s.poll();
            s.is_searching()
        })
        .await;
        assert_eq!(search.results, ResultsView::NoResults);

        backend.fail_search(None);
        search.search("zzz", &backend);
        settle(&mut search, |s| {
            s.poll();
            s.is_searching()
        })
        .await;
        assert_eq!(search.results, ResultsView::NoResults);

        backend.fail_search(Some(503));
        search.search("zzz", &backend);
        settle(&mut search, |s| {
            s.poll();
            s.is_searching()
        })
        .await;
        assert_eq!(search.results, ResultsView::Error);
    }

    #[tokio::test]
    async fn test_pick_copies_name_and_hides_results() {
        let backend = MockBackend::default();
        backend.set_hits(vec![hit("2", "Mario 2", 4)]);
        let mut search = state();
        search.search("mario", &backend);
        settle(&mut search, |s| {
            s.poll();
            s.is_searching()
        })
        .await;

        let card = search.pick(0).expect("card");
        assert_eq!(card.total_versions, 4);
        assert_eq!(search.name_input, "Mario 2");
        assert!(!search.results.is_visible());
        assert!(search.pick(0).is_none());
    }

    #[test]
    fn test_mode_switch_hides_results() {
        let mut search = state();
        search.results = ResultsView::NoResults;
        search.set_mode(SearchMode::Hash);
        assert_eq!(search.mode, SearchMode::Hash);
        assert!(!search.results.is_visible());
    }
}
