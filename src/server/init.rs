//! Server initialization and run loop

use super::loader::load_config;
use anyhow::{Context, Result};
use rconbot_channels::DiscordAdapter;
use rconbot_core::Restarter;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Start the bot and serve until Ctrl-C.
///
/// Missing configuration and login failures are returned as errors, which
/// makes the process exit with status 1.
pub async fn run() -> Result<()> {
    let config = load_config()?;

    let discord = match config.discord_config() {
        Ok(discord) => discord,
        Err(e) => {
            error!(error = %e, "Missing required configuration");
            return Err(e).context("Invalid Discord configuration");
        }
    };

    info!(
        channel_id = %discord.channel_id,
        working_dir = %config.restart.working_dir.display(),
        "Configuration loaded"
    );

    let restarter = Arc::new(Restarter::new(config.restart.clone()));
    let adapter = Arc::new(DiscordAdapter::new(discord, restarter, config.panel.clone()));

    if let Err(e) = adapter.run_until(shutdown_signal()).await {
        error!(error = %e, "Login failed");
        return Err(e).context("Discord bot stopped");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
