//! Catalog browsing commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::{CatalogBackend, GameId, GameVersion, GamesPage};
use crate::cli::client;
use crate::cli::output::{print_formatted, OutputFormat};
use crate::config::Config;
use crate::messages::Messages;
use crate::query::QueryState;
use crate::view::{ListView, VersionsCursor, VersionsView};

#[derive(Subcommand, Debug)]
pub enum GamesCommands {
    /// List one page of the catalog
    List(QueryArgs),

    /// Show the ranked versions of a game
    Versions {
        /// Game id
        game_id: String,

        /// Page of the version list
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Print the versions modal markup instead of the list
        #[arg(long)]
        render: bool,

        /// Game name for the modal heading (defaults to the id)
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the list, summary and pagination markup for a page
    Render(QueryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Free-text name filter
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Console to restrict to
    #[arg(short, long, default_value = "")]
    pub console: String,

    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page (defaults to catalog.page_size)
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl QueryArgs {
    fn to_query(&self, config: &Config) -> QueryState {
        let mut query = QueryState::with_page_size(self.page_size.unwrap_or(config.catalog.page_size));
        query.set_filter(&self.filter);
        query.set_console(&self.console);
        query.set_page(self.page);
        query
    }
}

#[derive(Serialize)]
struct VersionsResult<'a> {
    game_id: &'a str,
    page: u32,
    total_pages: u32,
    versions: Vec<&'a GameVersion>,
}

pub async fn run(command: GamesCommands, config: &Config, format: OutputFormat, _quiet: bool) -> Result<()> {
    let msgs = Messages::for_locale(&config.ui.locale);
    match command {
        GamesCommands::List(args) => list(&args, config, &msgs, format).await,
        GamesCommands::Versions {
            game_id,
            page,
            render,
            name,
        } => {
            if render {
                let name = name.as_deref().unwrap_or(&game_id);
                render_versions(&game_id, name, page, config, &msgs).await
            } else {
                versions(&game_id, page, config, &msgs, format).await
            }
        }
        GamesCommands::Render(args) => render(&args, config, &msgs).await,
    }
}

async fn fetch_page(query: &QueryState, config: &Config) -> Result<GamesPage> {
    client(config)?
        .list_games(query)
        .await
        .with_context(|| format!("Failed to fetch the catalog from {}", config.server.base_url))
}

async fn list(args: &QueryArgs, config: &Config, msgs: &Messages, format: OutputFormat) -> Result<()> {
    let query = args.to_query(config);
    let page = fetch_page(&query, config).await?;

    print_formatted(&page, format, |p| format_list_text(p, &query, msgs));
    Ok(())
}

fn format_list_text(page: &GamesPage, query: &QueryState, msgs: &Messages) -> String {
    let view = ListView::from_page(page, query, msgs);
    let mut lines = vec![view.summary().unwrap_or_default().to_string(), String::new()];

    if view.rows().is_empty() {
        lines.push(msgs.no_results.to_string());
        return lines.join("\n");
    }

    lines.push(format!("{:>8}  {:<40} {:<24} {}", "ID", "Name", msgs.consoles, msgs.versions));
    for row in view.rows() {
        lines.push(format!(
            "{:>8}  {:<40} {:<24} {}",
            row.id, row.name, row.consoles, row.versions
        ));
    }
    if let Some(pagination) = view.pagination() {
        lines.push(String::new());
        lines.push(pagination.label(msgs));
    }
    lines.join("\n")
}

async fn fetch_versions(game_id: &str, page: u32, config: &Config) -> Result<VersionsCursor> {
    let all = client(config)?
        .game_versions(&GameId::new(game_id))
        .await
        .with_context(|| format!("Failed to load versions of game {}", game_id))?;

    let mut cursor = VersionsCursor::new(all, config.versions.page_size);
    cursor.set_page(page);
    Ok(cursor)
}

async fn versions(game_id: &str, page: u32, config: &Config, msgs: &Messages, format: OutputFormat) -> Result<()> {
    let cursor = fetch_versions(game_id, page, config).await?;

    let result = VersionsResult {
        game_id,
        page: cursor.page(),
        total_pages: cursor.total_pages(),
        versions: cursor.current().map(|(_, v)| v).collect(),
    };

    print_formatted(&result, format, |_| format_versions_text(game_id, &cursor, msgs));
    Ok(())
}

fn format_versions_text(game_id: &str, cursor: &VersionsCursor, msgs: &Messages) -> String {
    if cursor.is_empty() {
        return msgs.no_versions.to_string();
    }

    let view = VersionsView::page(game_id, cursor);
    let mut lines = Vec::new();
    for card in view.cards() {
        let mut tags: Vec<&str> = Vec::new();
        if card.recommended {
            tags.push(msgs.recommended);
        }
        if let Some(region) = &card.region {
            tags.push(region);
        }
        if card.is_hack {
            tags.push(msgs.hack);
        }
        if card.is_translation {
            tags.push(msgs.translation);
        }
        lines.push(format!("{:>3}. {}", card.index, card.title));
        lines.push(format!("     {}  [{}]", card.hash, tags.join(", ")));
    }
    lines.push(String::new());
    lines.push(msgs.page_label(cursor.page(), cursor.total_pages()));
    lines.join("\n")
}

async fn render_versions(game_id: &str, name: &str, page: u32, config: &Config, msgs: &Messages) -> Result<()> {
    let cursor = fetch_versions(game_id, page, config).await?;
    println!("{}", versions_markup(name, &cursor, msgs));
    Ok(())
}

/// Heading, container and pagination of the versions modal, one per line
fn versions_markup(name: &str, cursor: &VersionsCursor, msgs: &Messages) -> String {
    let view = if cursor.is_empty() {
        VersionsView::error(name, msgs.no_versions)
    } else {
        VersionsView::page(name, cursor)
    };
    [
        view.label_element(msgs).render(),
        view.container_element(msgs).render(),
        view.pagination_element(msgs).render(),
    ]
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("\n")
}

async fn render(args: &QueryArgs, config: &Config, msgs: &Messages) -> Result<()> {
    let query = args.to_query(config);
    let page = fetch_page(&query, config).await?;
    let view = ListView::from_page(&page, &query, msgs);

    println!("{}", view.summary_element().render());
    println!("{}", view.list_element(msgs).render());
    println!("{}", view.pagination_element(msgs).render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GameSummary;

    fn page(names: &[&str]) -> GamesPage {
        GamesPage {
            items: names
                .iter()
                .map(|n| GameSummary {
                    id: GameId::new("3"),
                    name: n.to_string(),
                    consoles: vec!["NES".to_string(), "SNES".to_string()],
                    versions: 4,
                })
                .collect(),
            total: names.len() as u64,
            page: 1,
            total_pages: 1,
        }
    }

    #[test]
    fn test_query_args_use_configured_page_size() {
        let mut config = Config::default();
        config.catalog.page_size = 25;
        let args = QueryArgs {
            filter: "  zelda ".to_string(),
            console: String::new(),
            page: 3,
            page_size: None,
        };
        assert_eq!(args.to_query(&config).query_string(), "q=zelda&page=3&page_size=25");
    }

    #[test]
    fn test_list_text() {
        let msgs = Messages::english();
        let query = QueryState::default();
        let text = format_list_text(&page(&["Zelda"]), &query, &msgs);
        assert!(text.starts_with("1 games found"));
        assert!(text.contains("NES, SNES"));
        assert!(text.ends_with("Page 1 of 1"));

        let empty = format_list_text(&page(&[]), &query, &msgs);
        assert!(empty.ends_with(msgs.no_results));
    }

    fn version(hash: &str) -> GameVersion {
        serde_json::from_value(serde_json::json!({
            "hash": hash,
            "info": {"filename": "Zelda (USA).nes", "region": "USA"}
        }))
        .unwrap()
    }

    #[test]
    fn test_versions_markup() {
        let msgs = Messages::english();
        let cursor = VersionsCursor::new(vec![version("AAAA0000"), version("BBBB1111")], 10);
        let markup = versions_markup("Zelda", &cursor, &msgs);
        let lines: Vec<&str> = markup.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("<h3 id=\"versionsModalLabel\">"));
        assert!(lines[0].contains("Versions of: Zelda"));
        assert!(lines[1].starts_with("<div id=\"versionsContainer\">"));
        assert!(lines[1].contains("data-hash=\"AAAA0000\""));
        assert!(lines[2].starts_with("<div id=\"versionsPagination\""));
    }

    #[test]
    fn test_versions_markup_without_versions() {
        let msgs = Messages::english();
        let cursor = VersionsCursor::new(Vec::new(), 10);
        let markup = versions_markup("Zelda", &cursor, &msgs);
        assert!(markup.contains(msgs.no_versions));
        assert!(markup.ends_with("<div id=\"versionsPagination\"></div>"));
    }
}
