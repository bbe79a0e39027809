use super::adapter::{activation_event, ComponentResponder, DiscordAdapter, DiscordResolver};
use super::commands::DiscordCommands;
use super::controller::ReadyOutcome;
use serenity::all::{Command, Context, EventHandler, Interaction, Ready};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Discord event handler
pub struct DiscordHandler {
    adapter: Arc<DiscordAdapter>,
    commands: DiscordCommands,
}

impl DiscordHandler {
    /// Create a new Discord event handler.
    pub fn new(adapter: Arc<DiscordAdapter>) -> Self {
        let commands = DiscordCommands::new(adapter.controller.clone());
        Self { adapter, commands }
    }
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let discriminator = ready
            .user
            .discriminator
            .map(|d| format!("#{}", d))
            .unwrap_or_default();
        info!("Bot online as {}{}", ready.user.name, discriminator);

        let resolver = DiscordResolver::new(ctx.http.clone());
        let outcome = self
            .adapter
            .controller
            .on_ready(&resolver, self.adapter.config.channel_id)
            .await;
        debug!(?outcome, "Ready handled");

        if outcome == ReadyOutcome::AlreadyReady {
            return;
        }

        match Command::set_global_commands(&ctx.http, DiscordCommands::definitions()).await {
            Ok(cmds) => info!("Registered {} Discord slash commands", cmds.len()),
            Err(e) => error!(error = %e, "Failed to register Discord slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Component(component) => {
                let Some(event) = activation_event(&component) else {
                    return;
                };
                let responder = ComponentResponder::new(&ctx.http, &component);
                let outcome = self
                    .adapter
                    .controller
                    .handle_activation(event, &responder)
                    .await;
                debug!(?outcome, "Component interaction handled");
            }
            Interaction::Command(command) => {
                self.commands.handle(&ctx, &command).await;
            }
            _ => {}
        }
    }
}
