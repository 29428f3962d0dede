//! Name search command

use anyhow::{Context, Result};
use clap::Args;

use crate::api::{ApiError, CatalogBackend, SearchHit};
use crate::cli::client;
use crate::cli::output::{print_formatted, print_success, OutputFormat};
use crate::config::Config;
use crate::messages::Messages;
use crate::view::ResultsView;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Game name, or part of it
    pub term: String,

    /// Print the search results dropdown markup instead of a list
    #[arg(long)]
    pub render: bool,
}

pub async fn run(args: SearchArgs, config: &Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let msgs = Messages::for_locale(&config.ui.locale);
    let term = args.term.trim();
    if term.chars().count() < config.search.min_chars {
        anyhow::bail!("Search term must be at least {} characters", config.search.min_chars);
    }

    let hits = match client(config)?.search_games(term).await {
        Ok(hits) => hits,
        Err(ApiError::Unsuccessful(_)) => Vec::new(),
        Err(e) => return Err(e).with_context(|| msgs.search_error.to_string()),
    };

    if args.render {
        println!("{}", ResultsView::from_hits(&hits).to_element(&msgs).render());
        return Ok(());
    }

    if hits.is_empty() && format == OutputFormat::Text {
        print_success(msgs.no_results, quiet);
        return Ok(());
    }

    print_formatted(&hits, format, |h| format_hits_text(h, &msgs));
    Ok(())
}

fn format_hits_text(hits: &[SearchHit], msgs: &Messages) -> String {
    let view = ResultsView::from_hits(hits);
    let mut lines = Vec::new();
    for (i, card) in view.cards().iter().enumerate() {
        let mut tags = Vec::new();
        tags.extend(card.versions_badge(msgs));
        if let Some(region) = &card.region {
            tags.push(region.clone());
        }
        if card.is_hack {
            tags.push(msgs.hack.to_string());
        }

        lines.push(format!("{:>3}. {}  [{}]", i + 1, card.name, tags.join(", ")));
        lines.push(format!("     ID: {} | Hash: {}", card.id, card.hash_preview()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GameId, PrimaryInfo};

    #[test]
    fn test_hits_text() {
        let msgs = Messages::english();
        let hits = vec![SearchHit {
            id: GameId::new("12"),
            hash: "FFFFFFFFFFFFFFFF0000".to_string(),
            name: "Metroid".to_string(),
            total_versions: 2,
            primary_info: PrimaryInfo {
                region: Some("Japan".to_string()),
                is_hack: true,
            },
        }];

        let text = format_hits_text(&hits, &msgs);
        assert_eq!(
            text,
            "  1. Metroid  [2 versions, Japan, HACK]\n     ID: 12 | Hash: FFFFFFFFFFFFFFFF..."
        );
    }

    #[test]
    fn test_empty_results_render_placeholder() {
        let msgs = Messages::english();
        let html = ResultsView::from_hits(&[]).to_element(&msgs).render();
        assert!(html.as_str().starts_with("<div id=\"searchResults\""));
        assert!(html.as_str().contains(msgs.no_results));
    }
}
