//! `rconbot check` - validate configuration

use crate::server::load_config;
use anyhow::{Context, Result};
use rconbot_channels::util::mask_secret;

pub fn run() -> Result<()> {
    let config = load_config()?;
    let discord = config
        .discord_config()
        .context("Discord configuration is incomplete")?;

    println!("Discord");
    println!("  token:       {}", mask_secret(&discord.bot_token));
    println!("  channel:     {}", discord.channel_id);
    println!("Restart");
    println!("  working dir: {}", config.restart.working_dir.display());
    println!("  stop:        {}", config.restart.down);
    println!("  start:       {}", config.restart.up);

    if !config.restart.working_dir.is_dir() {
        println!(
            "  warning: {} does not exist",
            config.restart.working_dir.display()
        );
    }
    Ok(())
}
