//! rconbot - Discord restart button for the CRCON stack
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod server;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rconbot=info,rconbot_core=info,rconbot_channels=info,serenity=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();

    if matches!(cli.command, None | Some(cli::Commands::Serve)) {
        info!("Starting rconbot v{}", env!("CARGO_PKG_VERSION"));

        if !std::path::Path::new(".env").exists() {
            warn!(".env file not found; reading configuration from the environment only");
        }
    }

    cli::run(cli).await
}
