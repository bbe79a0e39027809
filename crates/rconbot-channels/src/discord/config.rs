use crate::error::{Error, Result};
use crate::util::mask_secret;
use std::fmt;

/// Discord bot configuration
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token (from DISCORD_TOKEN env)
    pub bot_token: String,
    /// Channel holding the control message (from DISCORD_CHANNEL_ID env)
    pub channel_id: u64,
}

impl DiscordConfig {
    /// Create with a bot token and channel ID
    #[must_use]
    pub fn new(bot_token: impl Into<String>, channel_id: u64) -> Self {
        Self {
            bot_token: bot_token.into(),
            channel_id,
        }
    }

    /// Validate raw settings.
    ///
    /// Both values are required; the channel ID must be a non-zero snowflake.
    pub fn from_parts(bot_token: Option<&str>, channel_id: Option<&str>) -> Result<Self> {
        let bot_token = bot_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config("DISCORD_TOKEN is missing".to_string()))?;

        let raw_channel = channel_id
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Config("DISCORD_CHANNEL_ID is missing".to_string()))?;

        let channel_id = raw_channel
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| {
                Error::Config(format!("DISCORD_CHANNEL_ID is invalid: {}", raw_channel))
            })?;

        Ok(Self::new(bot_token, channel_id))
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &mask_secret(&self.bot_token))
            .field("channel_id", &self.channel_id)
            .finish()
    }
}
