//! CLI module for Retro Downloader
//!
//! Browse, search and download from the catalog without the desktop window.

mod commands;
mod output;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::CatalogClient;
use crate::config::Config;

pub use output::OutputFormat;

/// Retro Downloader - ROM catalog client
#[derive(Parser, Debug)]
#[command(name = "retro-downloader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub output: OutputOptions,

    /// Catalog server to use instead of the configured one
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Without a subcommand the desktop window opens
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the catalog
    Games {
        #[command(subcommand)]
        command: commands::games::GamesCommands,
    },

    /// Search games by name
    Search(commands::search::SearchArgs),

    /// Resolve content hashes and open their downloads
    Download(commands::download::DownloadArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Interactive shell
    Shell,
}

/// Load the configuration, applying the `--server` override
pub fn load_config(server: Option<&str>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(server) = server {
        config.server.base_url = server.to_string();
    }
    Ok(config)
}

/// Catalog client for the configured server
pub fn client(config: &Config) -> Result<CatalogClient> {
    CatalogClient::new(&config.server.base_url)
        .with_context(|| format!("Invalid server URL: {}", config.server.base_url))
}

/// Run a CLI command with parsed arguments
pub async fn run(command: Commands, output: OutputOptions, server: Option<String>) -> Result<()> {
    let format = output.format();
    let quiet = output.quiet;
    let server = server.as_deref();

    match command {
        Commands::Games { command } => commands::games::run(command, &load_config(server)?, format, quiet).await,
        Commands::Search(args) => commands::search::run(args, &load_config(server)?, format, quiet).await,
        Commands::Download(args) => commands::download::run(args, &load_config(server)?, format, quiet).await,
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
        Commands::Shell => shell::run(&load_config(server)?).await,
    }
}
