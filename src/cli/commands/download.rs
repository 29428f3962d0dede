//! Batch download command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::api::CatalogBackend;
use crate::cli::client;
use crate::cli::output::{print_formatted, print_status, OutputFormat};
use crate::config::Config;
use crate::messages::Messages;
use crate::util::is_valid_hash;
use crate::view::StatusView;

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Content hashes to download
    #[arg(required = true, num_args = 1..)]
    pub hashes: Vec<String>,

    /// Print the resolved URLs instead of opening them
    #[arg(long)]
    pub print_only: bool,

    /// Write hashes that could not be downloaded to this file, one per line
    #[arg(long, value_name = "FILE")]
    pub missing_out: Option<PathBuf>,

    /// Accept hashes that are not hexadecimal or shorter than 8 characters
    #[arg(long)]
    pub no_validate: bool,

    /// Print each outcome as status banner markup
    #[arg(long)]
    pub render: bool,
}

/// Outcome for one hash
#[derive(Serialize)]
struct DownloadOutcome {
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct DownloadReport {
    ok: usize,
    total: usize,
    results: Vec<DownloadOutcome>,
}

impl DownloadOutcome {
    /// The status banner this outcome leaves behind
    fn status(&self, msgs: &Messages) -> StatusView {
        match &self.error {
            Some(error) => StatusView::error(error.as_str()),
            None => StatusView::success(msgs.downloaded),
        }
    }
}

impl DownloadReport {
    fn missing(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.error.is_some())
            .map(|r| r.hash.as_str())
    }
}

pub async fn run(args: DownloadArgs, config: &Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let msgs = Messages::for_locale(&config.ui.locale);
    let backend = client(config)?;

    let mut results = Vec::with_capacity(args.hashes.len());
    for raw in &args.hashes {
        let hash = raw.trim();
        let outcome = download_one(&backend, hash, &args, &msgs).await;
        if args.render {
            println!("{}", outcome.status(&msgs).to_element().render());
        } else if format == OutputFormat::Text && !quiet {
            match (&outcome.url, &outcome.error) {
                (Some(url), None) if args.print_only => println!("{}", url),
                (_, Some(error)) => print_status(false, &format!("{}: {}", hash, error)),
                _ => print_status(true, hash),
            }
        }
        results.push(outcome);
    }

    let report = DownloadReport {
        ok: results.iter().filter(|r| r.error.is_none()).count(),
        total: results.len(),
        results,
    };

    if let Some(path) = &args.missing_out {
        let content: String = report.missing().map(|h| format!("{}\n", h)).collect();
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote missing hashes to {:?}", path);
    }

    print_formatted(&report, format, |r| format!("{}/{}", r.ok, r.total));
    Ok(())
}

async fn download_one<B: CatalogBackend>(backend: &B, hash: &str, args: &DownloadArgs, msgs: &Messages) -> DownloadOutcome {
    let failed = |error: String| DownloadOutcome {
        hash: hash.to_string(),
        url: None,
        error: Some(error),
    };

    if !args.no_validate && !is_valid_hash(hash) {
        return failed(msgs.invalid_hash.to_string());
    }

    let url = match backend.resolve_download(hash).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Failed to resolve {}: {}", hash, e);
            return failed(msgs.download_failure(&e));
        }
    };

    if !args.print_only {
        if let Err(e) = open::that(&url) {
            tracing::error!("Failed to open {}: {}", url, e);
            return failed(e.to_string());
        }
    }

    DownloadOutcome {
        hash: hash.to_string(),
        url: Some(url),
        error: None,
    }
}
