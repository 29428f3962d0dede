//! In-memory catalog backend and helpers shared by the unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::api::{
    ApiError, CatalogBackend, GameId, GameSummary, GameVersion, GamesPage, PrimaryInfo, SearchHit, VersionInfo,
};
use crate::query::QueryState;

/// A request the mock backend received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListGames(QueryState),
    GameVersions(GameId),
    SearchGames(String),
    ResolveDownload(String),
}

/// Canned failure: an HTTP status, or an unsuccessful payload when `None`
#[derive(Debug, Clone)]
struct Failure {
    status: Option<u16>,
    message: Option<String>,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self.status {
            Some(status) => ApiError::Status {
                status,
                message: self.message.clone(),
            },
            None => ApiError::Unsuccessful(self.message.clone()),
        }
    }
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    games: Vec<GameSummary>,
    listing_failure: Option<Failure>,
    held_listings: HashMap<String, oneshot::Receiver<()>>,
    versions: HashMap<String, Result<Vec<GameVersion>, Failure>>,
    hits: Vec<SearchHit>,
    search_failure: Option<Failure>,
    download: Option<Result<String, Failure>>,
}

/// Records every call and answers with canned data
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    /// Every listing returns these games
    pub fn with_games(names: &[&str]) -> Self {
        let backend = Self::default();
        backend.lock().games = names
            .iter()
            .enumerate()
            .map(|(i, name)| GameSummary {
                id: GameId::new((i + 1).to_string()),
                name: name.to_string(),
                consoles: vec!["NES".to_string()],
                versions: 2,
            })
            .collect();
        backend
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(*c)).count()
    }

    pub fn list_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::ListGames(_)))
    }

    pub fn versions_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::GameVersions(_)))
    }

    pub fn search_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::SearchGames(_)))
    }

    pub fn resolve_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::ResolveDownload(_)))
    }

    pub fn fail_listing(&self, status: u16) {
        self.lock().listing_failure = Some(Failure {
            status: Some(status),
            message: None,
        });
    }

    /// Listings for `filter` wait until the returned sender fires or is dropped
    pub fn hold_listing(&self, filter: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().held_listings.insert(filter.to_string(), rx);
        tx
    }

    pub fn set_versions(&self, game_id: &str, versions: Vec<GameVersion>) {
        self.lock().versions.insert(game_id.to_string(), Ok(versions));
    }

    pub fn fail_versions(&self, game_id: &str, status: Option<u16>) {
        self.lock()
            .versions
            .insert(game_id.to_string(), Err(Failure { status, message: None }));
    }

    pub fn set_hits(&self, hits: Vec<SearchHit>) {
        let mut inner = self.lock();
        inner.hits = hits;
        inner.search_failure = None;
    }

    pub fn fail_search(&self, status: Option<u16>) {
        self.lock().search_failure = Some(Failure { status, message: None });
    }

    pub fn set_download_url(&self, url: &str) {
        self.lock().download = Some(Ok(url.to_string()));
    }

    pub fn fail_download(&self, status: Option<u16>, message: Option<&str>) {
        self.lock().download = Some(Err(Failure {
            status,
            message: message.map(str::to_string),
        }));
    }
}

impl CatalogBackend for MockBackend {
    async fn list_games(&self, query: &QueryState) -> Result<GamesPage, ApiError> {
        let held = {
            let mut inner = self.lock();
            inner.calls.push(Call::ListGames(query.clone()));
            inner.held_listings.remove(&query.filter)
        };
        if let Some(rx) = held {
            let _ = rx.await;
        }

        let inner = self.lock();
        if let Some(failure) = &inner.listing_failure {
            return Err(failure.to_error());
        }
        Ok(GamesPage {
            items: inner.games.clone(),
            total: inner.games.len() as u64,
            page: query.page(),
            total_pages: 1,
        })
    }

    async fn game_versions(&self, game_id: &GameId) -> Result<Vec<GameVersion>, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::GameVersions(game_id.clone()));
        match inner.versions.get(game_id.as_str()) {
            Some(Ok(versions)) => Ok(versions.clone()),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Ok(Vec::new()),
        }
    }

    async fn search_games(&self, term: &str) -> Result<Vec<SearchHit>, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::SearchGames(term.to_string()));
        match &inner.search_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(inner.hits.clone()),
        }
    }

    async fn resolve_download(&self, hash: &str) -> Result<String, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::ResolveDownload(hash.to_string()));
        match &inner.download {
            Some(Ok(url)) => Ok(url.clone()),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Err(ApiError::Unsuccessful(None)),
        }
    }

    fn download_page_url(&self, hash: &str) -> Result<String, ApiError> {
        Ok(format!("http://catalog.test/dl?hash={hash}"))
    }
}

/// Step a state until its request settles: `step` polls and reports whether
/// the request is still outstanding.
pub async fn settle<S>(state: &mut S, mut step: impl FnMut(&mut S) -> bool) {
    for _ in 0..200 {
        if !step(state) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("request never settled");
}

/// `n` versions with hashes `HASH0000`, `HASH0001`, ...
pub fn versions(n: usize) -> Vec<GameVersion> {
    (0..n)
        .map(|i| GameVersion {
            hash: format!("HASH{i:04}"),
            info: VersionInfo {
                filename: Some(format!("Game ({i}).zip")),
                region: Some("USA".to_string()),
                is_hack: false,
                is_translation: false,
            },
            rom_path: None,
        })
        .collect()
}

pub fn hit(id: &str, name: &str, total_versions: u32) -> SearchHit {
    SearchHit {
        id: GameId::new(id),
        hash: format!("{:0>32}", id),
        name: name.to_string(),
        total_versions,
        primary_info: PrimaryInfo {
            region: Some("USA".to_string()),
            is_hack: false,
        },
    }
}
