//! Server configuration types
//!
//! Contains all configuration structures for the rconbot server.

use rconbot_channels::{ControlPanel, DiscordConfig};
use rconbot_core::config::resolve_working_dir;
use rconbot_core::RestartConfig;
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub discord: DiscordSettings,
    #[serde(default)]
    pub restart: RestartConfig,
    #[serde(default)]
    pub panel: ControlPanel,
}

/// Raw Discord settings, validated by [`AppConfig::discord_config`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordSettings {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

impl AppConfig {
    /// Validated Discord configuration; fails when the token or channel is missing
    pub fn discord_config(&self) -> rconbot_channels::Result<DiscordConfig> {
        DiscordConfig::from_parts(
            self.discord.token.as_deref(),
            self.discord.channel_id.as_deref(),
        )
    }

    /// Apply the blank-path fallback to the restart working directory
    pub(crate) fn normalize(mut self) -> Self {
        let raw = self.restart.working_dir.to_string_lossy().into_owned();
        self.restart.working_dir = resolve_working_dir(Some(&raw));
        self
    }
}
