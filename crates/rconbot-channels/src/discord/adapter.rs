use super::config::DiscordConfig;
use super::controller::{
    ActivationEvent, ActivationResponder, ChannelResolver, ControlChannel, Controller,
    RecentMessage,
};
use super::handler::DiscordHandler;
use super::panel::ControlPanel;
use crate::error::{Error, Result};

use rconbot_core::Restarter;
use serenity::all::{
    Channel, ChannelId, ChannelType, Client, CommandInteraction, ComponentInteraction,
    ComponentInteractionDataKind, CreateInteractionResponseFollowup, GatewayIntents, GetMessages,
    MessageId,
};
use serenity::http::Http;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, instrument};

/// Discord bot adapter
pub struct DiscordAdapter {
    pub(crate) config: DiscordConfig,
    pub(crate) controller: Arc<Controller>,
}

impl DiscordAdapter {
    /// Create a new Discord adapter
    #[must_use]
    pub fn new(config: DiscordConfig, restarter: Arc<Restarter>, panel: ControlPanel) -> Self {
        Self {
            config,
            controller: Arc::new(Controller::new(restarter, panel)),
        }
    }

    /// The interaction controller
    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    /// Connect and serve events until `shutdown` resolves.
    ///
    /// Returns `Error::Login` when the gateway rejects the connection.
    #[instrument(skip(self, shutdown), fields(channel_id = %self.config.channel_id))]
    pub async fn run_until<F>(self: Arc<Self>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!("Starting Discord bot");

        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;
        let handler = DiscordHandler::new(self.clone());

        let mut client = Client::builder(&self.config.bot_token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| Error::Login(format!("Failed to create client: {}", e)))?;

        let shard_manager = client.shard_manager.clone();

        tokio::select! {
            result = client.start() => {
                result.map_err(|e| Error::Login(e.to_string()))?;
            }
            _ = shutdown => {
                info!("Discord bot shutting down...");
                shard_manager.shutdown_all().await;
            }
        }

        Ok(())
    }
}

/// Whether messages can be posted to a channel of this kind
#[must_use]
pub fn is_text_capable(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text
            | ChannelType::News
            | ChannelType::Voice
            | ChannelType::NewsThread
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
    )
}

/// Fetch a channel and check it can hold the control message
pub async fn resolve_text_channel(http: &Http, channel_id: u64) -> Result<ChannelId> {
    let id = ChannelId::new(channel_id);
    let channel = http
        .get_channel(id)
        .await
        .map_err(|e| Error::ChannelUnavailable(format!("{}: {}", channel_id, e)))?;

    match channel {
        Channel::Guild(guild_channel) if is_text_capable(guild_channel.kind) => Ok(id),
        Channel::Private(_) => Ok(id),
        _ => Err(Error::ChannelUnavailable(format!(
            "{} is not a text channel",
            channel_id
        ))),
    }
}

/// Resolves channel IDs over the Discord HTTP API
pub struct DiscordResolver {
    http: Arc<Http>,
}

impl DiscordResolver {
    /// Wrap the gateway's HTTP client
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl ChannelResolver for DiscordResolver {
    async fn resolve(&self, channel_id: u64) -> Result<Box<dyn ControlChannel>> {
        let id = resolve_text_channel(&self.http, channel_id).await?;
        Ok(Box::new(DiscordChannel::new(self.http.clone(), id)))
    }
}

/// A Discord channel seen through [`ControlChannel`]
pub struct DiscordChannel {
    http: Arc<Http>,
    id: ChannelId,
}

impl DiscordChannel {
    /// Wrap a channel ID
    pub fn new(http: Arc<Http>, id: ChannelId) -> Self {
        Self { http, id }
    }
}

#[async_trait::async_trait]
impl ControlChannel for DiscordChannel {
    fn id(&self) -> u64 {
        self.id.get()
    }

    async fn recent_messages(&self, limit: u8) -> Result<Vec<RecentMessage>> {
        let messages = self
            .id
            .messages(&self.http, GetMessages::new().limit(limit))
            .await?;

        Ok(messages
            .iter()
            .map(|m| RecentMessage {
                id: m.id.get(),
                created_at: m.timestamp.unix_timestamp(),
            })
            .collect())
    }

    async fn delete_messages(&self, ids: Vec<u64>) -> Result<()> {
        let ids: Vec<MessageId> = ids.into_iter().map(MessageId::new).collect();
        self.id.delete_messages(&self.http, &ids).await?;
        Ok(())
    }

    async fn post_panel(&self, panel: &ControlPanel) -> Result<u64> {
        let sent = self.id.send_message(&self.http, panel.to_message()).await?;
        Ok(sent.id.get())
    }
}

/// Convert a component interaction into an activation event.
///
/// Only buttons qualify; select menus return `None`.
pub fn activation_event(component: &ComponentInteraction) -> Option<ActivationEvent> {
    if !matches!(component.data.kind, ComponentInteractionDataKind::Button) {
        return None;
    }
    Some(ActivationEvent {
        interaction_id: component.id.get(),
        custom_id: component.data.custom_id.clone(),
        user_id: component.user.id.get(),
        user_name: component.user.name.clone(),
    })
}

/// Response slot of a button interaction
pub struct ComponentResponder<'a> {
    http: &'a Http,
    interaction: &'a ComponentInteraction,
}

impl<'a> ComponentResponder<'a> {
    /// Wrap a component interaction
    pub fn new(http: &'a Http, interaction: &'a ComponentInteraction) -> Self {
        Self { http, interaction }
    }
}

#[async_trait::async_trait]
impl<'a> ActivationResponder for ComponentResponder<'a> {
    async fn defer_ephemeral(&self) -> Result<()> {
        self.interaction.defer_ephemeral(self.http).await?;
        Ok(())
    }

    async fn followup_ephemeral(&self, content: String) -> Result<()> {
        let builder = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        self.interaction.create_followup(self.http, builder).await?;
        Ok(())
    }
}

/// Response slot of a slash command interaction
pub struct CommandResponder<'a> {
    http: &'a Http,
    interaction: &'a CommandInteraction,
}

impl<'a> CommandResponder<'a> {
    /// Wrap a slash command interaction
    pub fn new(http: &'a Http, interaction: &'a CommandInteraction) -> Self {
        Self { http, interaction }
    }
}

#[async_trait::async_trait]
impl<'a> ActivationResponder for CommandResponder<'a> {
    async fn defer_ephemeral(&self) -> Result<()> {
        self.interaction.defer_ephemeral(self.http).await?;
        Ok(())
    }

    async fn followup_ephemeral(&self, content: String) -> Result<()> {
        let builder = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        self.interaction.create_followup(self.http, builder).await?;
        Ok(())
    }
}
