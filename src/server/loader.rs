//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Plain environment variables and the keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DISCORD_TOKEN", "discord.token"),
    ("DISCORD_CHANNEL_ID", "discord.channel_id"),
    ("CRCON_PATH", "restart.working_dir"),
];

/// Load configuration from files and the process environment
pub fn load_config() -> Result<AppConfig> {
    load_config_with(|key| std::env::var(key).ok())
}

/// Load configuration, reading the plain override variables through `lookup`
pub fn load_config_with<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/local").required(false))
        // 3. Prefixed environment, e.g. RCONBOT_PANEL__TITLE
        .add_source(
            Environment::with_prefix("RCONBOT")
                .prefix_separator("_")
                .separator("__"),
        );

    // 4. DISCORD_TOKEN / DISCORD_CHANNEL_ID / CRCON_PATH (highest priority).
    // Blank values count as unset.
    for (var, key) in ENV_OVERRIDES {
        let value = lookup(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        builder = builder
            .set_override_option(*key, value)
            .with_context(|| format!("Failed to apply {}", var))?;
    }

    let config: AppConfig = builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    Ok(config.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_with(|key| vars.get(key).cloned()).expect("config loads")
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config.restart.working_dir, PathBuf::from("/root/hll_rcon_tool"));
        assert_eq!(config.restart.down.to_string(), "docker compose down");
        assert_eq!(config.panel.title, "RCON Control");
        assert_eq!(config.panel.color, 0x00ff00);
        assert!(config.discord.token.is_none());
    }

    #[test]
    fn test_plain_env_overrides() {
        let config = load(&[
            ("DISCORD_TOKEN", "abc.def"),
            ("DISCORD_CHANNEL_ID", "123456789012345678"),
            ("CRCON_PATH", "  /srv/crcon  "),
        ]);
        let discord = config.discord_config().unwrap();
        assert_eq!(discord.bot_token, "abc.def");
        assert_eq!(discord.channel_id, 123456789012345678);
        assert_eq!(config.restart.working_dir, PathBuf::from("/srv/crcon"));
    }

    #[test]
    fn test_blank_crcon_path_uses_default() {
        let config = load(&[("CRCON_PATH", "   ")]);
        assert_eq!(config.restart.working_dir, PathBuf::from("/root/hll_rcon_tool"));
    }

    #[test]
    fn test_missing_discord_settings_rejected() {
        let config = load(&[("DISCORD_TOKEN", "abc")]);
        assert!(config.discord_config().is_err());
    }
}
