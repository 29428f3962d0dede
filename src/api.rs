//! HTTP client for the ROM catalog backend.
//!
//! This module provides:
//!
//! - `CatalogBackend`: the seam the controller talks through
//! - `CatalogClient`: reqwest-backed implementation of the backend
//! - Deserialized response types for every endpoint
//! - `ApiError`: the single error taxonomy for network, status and payload failures
//!
//! Endpoints consumed (relative to the configured base URL):
//!
//! - `GET  api/games`          paginated catalog listing
//! - `POST get_game_versions`  ranked versions of one game
//! - `POST search_games`       name search
//! - `POST search`             resolve a content hash to a download URL
//! - `GET  dl?hash=`           navigation target for a direct download

use std::future::Future;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::query::QueryState;

/// Default backend location (the catalog site's development server)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// User agent for API requests
const USER_AGENT: &str = concat!("Retro-Downloader/", env!("CARGO_PKG_VERSION"));

/// Errors raised by the fetch layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request was not successful{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unsuccessful(Option<String>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status code, when the server answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-provided explanation, when there is one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } | ApiError::Unsuccessful(message) => message.as_deref(),
            _ => None,
        }
    }
}

/// Opaque game identifier. The backend sends it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawGameId")]
pub struct GameId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGameId {
    Int(i64),
    Str(String),
}

impl From<RawGameId> for GameId {
    fn from(raw: RawGameId) -> Self {
        match raw {
            RawGameId::Int(n) => GameId(n.to_string()),
            RawGameId::Str(s) => GameId(s),
        }
    }
}

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the catalog listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSummary {
    #[serde(default)]
    pub id: GameId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub consoles: Vec<String>,
    #[serde(default, alias = "total_versions")]
    pub versions: u32,
}

/// A page of the catalog listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamesPage {
    #[serde(default)]
    pub items: Vec<GameSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

/// Descriptive metadata attached to a version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub is_hack: bool,
    #[serde(default)]
    pub is_translation: bool,
}

/// A downloadable version of a game, identified by its content hash
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameVersion {
    pub hash: String,
    #[serde(default)]
    pub info: VersionInfo,
    #[serde(default)]
    pub rom_path: Option<String>,
}

impl GameVersion {
    /// Title shown for this version: filename, then ROM path, then the hash itself
    pub fn title(&self) -> &str {
        self.info
            .filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .or(self.rom_path.as_deref().filter(|p| !p.is_empty()))
            .unwrap_or(&self.hash)
    }
}

#[derive(Debug, Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    versions: Vec<GameVersion>,
}

/// Summary metadata of a search hit's primary version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryInfo {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub is_hack: bool,
}

/// A name-search result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: GameId,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_versions: u32,
    #[serde(default)]
    pub primary_info: PrimaryInfo,
}

#[derive(Debug, Deserialize)]
struct SearchGamesResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    games: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Operations the controller needs from the catalog backend.
///
/// Futures are `Send` so requests can run as tokio tasks while the UI thread
/// keeps polling.
pub trait CatalogBackend: Clone + Send + Sync + 'static {
    /// `GET api/games` for the given query snapshot
    fn list_games(&self, query: &QueryState) -> impl Future<Output = Result<GamesPage, ApiError>> + Send;

    /// `POST get_game_versions`; `success:false` becomes `ApiError::Unsuccessful`
    fn game_versions(&self, game_id: &GameId) -> impl Future<Output = Result<Vec<GameVersion>, ApiError>> + Send;

    /// `POST search_games`; `success:false` becomes `ApiError::Unsuccessful`
    fn search_games(&self, term: &str) -> impl Future<Output = Result<Vec<SearchHit>, ApiError>> + Send;

    /// `POST search`, resolving a content hash to a download URL
    fn resolve_download(&self, hash: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// URL of the direct-download redirect for a content hash
    fn download_page_url(&self, hash: &str) -> Result<String, ApiError>;
}

/// reqwest-backed catalog client
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base: Url,
}

impl CatalogClient {
    /// Create a client rooted at `base_url`.
    ///
    /// A trailing slash is added when missing so endpoint paths resolve below
    /// any path prefix the site is mounted at.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, base })
    }

    /// Base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Send a request and decode the JSON body, mapping non-2xx to `ApiError::Status`
    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Build a status error, keeping the server's `message` when the body carries one
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message);
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

impl CatalogBackend for CatalogClient {
    async fn list_games(&self, query: &QueryState) -> Result<GamesPage, ApiError> {
        let start = std::time::Instant::now();
        let mut url = self.endpoint("api/games")?;
        query.apply_to(&mut url);

        let page: GamesPage = self.send_json(self.client.get(url)).await?;
        tracing::info!(
            "Fetched {} of {} games (page {}/{}) in {:.2}s",
            page.items.len(),
            page.total,
            page.page,
            page.total_pages,
            start.elapsed().as_secs_f32()
        );
        Ok(page)
    }

    async fn game_versions(&self, game_id: &GameId) -> Result<Vec<GameVersion>, ApiError> {
        let url = self.endpoint("get_game_versions")?;
        let request = self.client.post(url).form(&[("game_id", game_id.as_str())]);

        let response: VersionsResponse = self.send_json(request).await?;
        if !response.success {
            return Err(ApiError::Unsuccessful(None));
        }
        tracing::info!("Fetched {} versions for game {}", response.versions.len(), game_id);
        Ok(response.versions)
    }

    async fn search_games(&self, term: &str) -> Result<Vec<SearchHit>, ApiError> {
        let url = self.endpoint("search_games")?;
        let request = self.client.post(url).form(&[("search_term", term)]);

        let response: SearchGamesResponse = self.send_json(request).await?;
        if !response.success {
            return Err(ApiError::Unsuccessful(None));
        }
        tracing::info!("Search for {:?} returned {} games", term, response.games.len());
        Ok(response.games)
    }

    async fn resolve_download(&self, hash: &str) -> Result<String, ApiError> {
        let url = self.endpoint("search")?;
        let request = self.client.post(url).form(&[("search_term", hash)]);

        let response: ResolveResponse = self.send_json(request).await?;
        match response.download_url {
            Some(download_url) if response.success => Ok(download_url),
            _ => Err(ApiError::Unsuccessful(response.message)),
        }
    }

    fn download_page_url(&self, hash: &str) -> Result<String, ApiError> {
        let mut url = self.endpoint("dl")?;
        url.query_pairs_mut().append_pair("hash", hash);
        Ok(url.to_string())
    }
}
