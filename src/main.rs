mod api;
mod app;
mod cli;
mod config;
mod controller;
mod debounce;
mod markup;
mod messages;
mod modal;
mod query;
mod state;
mod task;
#[cfg(test)]
mod testing;
mod ui;
mod util;
mod view;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "retro_downloader=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Some(command) = cli.command {
        return cli::run(command, cli.output, cli.server).await;
    }

    tracing::info!("Starting Retro Downloader");

    let config = cli::load_config(cli.server.as_deref())?;
    let client = cli::client(&config)?;

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([900.0, 760.0])
        .with_min_inner_size([600.0, 480.0])
        .with_title("Retro Downloader");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Retro Downloader",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::RetroApp::new(cc, &config, client)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
