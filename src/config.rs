use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::view::DEFAULT_VERSIONS_PAGE_SIZE;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub versions: VersionsConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// What activating a catalog row does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    /// Open the versions modal for the game
    #[default]
    Versions,
    /// Only post an informational status
    Notice,
}

/// Catalog listing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub row_action: RowAction,
    /// Console filter choices
    #[serde(default = "default_consoles")]
    pub consoles: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            row_action: RowAction::default(),
            consoles: default_consoles(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_consoles() -> Vec<String> {
    ["NES", "SNES", "PS1", "PS2", "PSP", "ARCADE", "DC"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Incremental search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Shortest name query that is sent
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    /// Reject hash-mode input that is not hexadecimal and at least 8 characters
    #[serde(default)]
    pub validate_hash: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_chars: default_min_chars(),
            validate_hash: false,
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_chars() -> usize {
    2
}

/// How a picked version is downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionPick {
    /// Navigate to the `dl?hash=` redirect
    #[default]
    Redirect,
    /// Resolve the URL through `search` and show download phases
    Resolve,
}

/// Versions modal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionsConfig {
    #[serde(default = "default_versions_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub on_select: VersionPick,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            page_size: default_versions_page_size(),
            on_select: VersionPick::default(),
        }
    }
}

fn default_versions_page_size() -> usize {
    DEFAULT_VERSIONS_PAGE_SIZE
}

/// Download flow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Presentational pause between "downloading" and "downloaded"; 0 disables it
    #[serde(default = "default_completion_delay_ms")]
    pub completion_delay_ms: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            completion_delay_ms: default_completion_delay_ms(),
        }
    }
}

fn default_completion_delay_ms() -> u64 {
    1000
}

/// Appearance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub dark_theme: bool,
    /// UI language code
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_theme: true,
            locale: default_locale(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    "en".to_string()
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl DownloadConfig {
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }
}

/// Keys accepted by `get`/`set`, in `section.key` form
pub const KEYS: &[&str] = &[
    "server.base_url",
    "catalog.page_size",
    "catalog.row_action",
    "catalog.consoles",
    "search.debounce_ms",
    "search.min_chars",
    "search.validate_hash",
    "versions.page_size",
    "versions.on_select",
    "download.completion_delay_ms",
    "ui.dark_theme",
    "ui.locale",
];

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "retro-downloader", "RetroDownloader")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Read one value by `section.key`
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "server.base_url" => self.server.base_url.clone(),
            "catalog.page_size" => self.catalog.page_size.to_string(),
            "catalog.row_action" => enum_name(&self.catalog.row_action)?,
            "catalog.consoles" => self.catalog.consoles.join(","),
            "search.debounce_ms" => self.search.debounce_ms.to_string(),
            "search.min_chars" => self.search.min_chars.to_string(),
            "search.validate_hash" => self.search.validate_hash.to_string(),
            "versions.page_size" => self.versions.page_size.to_string(),
            "versions.on_select" => enum_name(&self.versions.on_select)?,
            "download.completion_delay_ms" => self.download.completion_delay_ms.to_string(),
            "ui.dark_theme" => self.ui.dark_theme.to_string(),
            "ui.locale" => self.ui.locale.clone(),
            _ => anyhow::bail!("Unknown config key: {} (valid keys: {})", key, KEYS.join(", ")),
        };
        Ok(value)
    }

    /// Set one value by `section.key`, parsing it to the field's type
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || format!("Invalid value for {}: {}", key, value);
        match key {
            "server.base_url" => {
                reqwest::Url::parse(value).with_context(invalid)?;
                self.server.base_url = value.to_string();
            }
            "catalog.page_size" => self.catalog.page_size = value.parse().with_context(invalid)?,
            "catalog.row_action" => self.catalog.row_action = parse_enum(value).with_context(invalid)?,
            "catalog.consoles" => {
                self.catalog.consoles = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "search.debounce_ms" => self.search.debounce_ms = value.parse().with_context(invalid)?,
            "search.min_chars" => self.search.min_chars = value.parse().with_context(invalid)?,
            "search.validate_hash" => self.search.validate_hash = value.parse().with_context(invalid)?,
            "versions.page_size" => self.versions.page_size = value.parse().with_context(invalid)?,
            "versions.on_select" => self.versions.on_select = parse_enum(value).with_context(invalid)?,
            "download.completion_delay_ms" => {
                self.download.completion_delay_ms = value.parse().with_context(invalid)?
            }
            "ui.dark_theme" => self.ui.dark_theme = value.parse().with_context(invalid)?,
            "ui.locale" => self.ui.locale = value.to_string(),
            _ => anyhow::bail!("Unknown config key: {} (valid keys: {})", key, KEYS.join(", ")),
        }
        Ok(())
    }
}

/// Serialized name of a unit enum variant
fn enum_name<T: Serialize>(value: &T) -> Result<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

fn parse_enum<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::String(value.to_lowercase()))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.catalog.page_size, 50);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.min_chars, 2);
        assert_eq!(config.versions.page_size, 10);
        assert_eq!(config.versions.on_select, VersionPick::Redirect);
        assert_eq!(config.download.completion_delay(), Duration::from_millis(1000));
        assert_eq!(config.catalog.row_action, RowAction::Versions);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://roms.local:8080"

            [versions]
            on_select = "resolve"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://roms.local:8080");
        assert_eq!(config.versions.on_select, VersionPick::Resolve);
        assert_eq!(config.versions.page_size, 10);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.ui.locale = "es".to_string();
        config.catalog.row_action = RowAction::Notice;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();
        config.set("versions.on_select", "Resolve").unwrap();
        assert_eq!(config.get("versions.on_select").unwrap(), "resolve");

        config.set("catalog.consoles", "NES, SNES,,GB").unwrap();
        assert_eq!(config.catalog.consoles, vec!["NES", "SNES", "GB"]);

        config.set("search.debounce_ms", "150").unwrap();
        assert_eq!(config.get("search.debounce_ms").unwrap(), "150");

        assert!(config.set("search.debounce_ms", "soon").is_err());
        assert!(config.set("server.base_url", "not a url").is_err());
        assert!(config.set("catalog.row_action", "explode").is_err());
        assert!(config.get("nope").is_err());
    }

    #[test]
    fn test_every_key_is_readable() {
        let config = Config::default();
        for key in KEYS {
            assert!(config.get(key).is_ok(), "{key} should be readable");
        }
    }
}
