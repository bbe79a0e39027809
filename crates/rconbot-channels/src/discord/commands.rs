use super::adapter::{CommandResponder, DiscordChannel};
use super::controller::{ActivationResponder, Controller};
use serenity::all::{
    CommandInteraction, Context, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseMessage, CurrentApplicationInfo, Permissions,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Slash command that re-posts the control panel
pub const SETUP_COMMAND: &str = "rconsetup";

const PERMISSION_DENIED: &str = "You don't have permission to use this command.";
const PANEL_POSTED: &str = "RCON control panel posted!";

/// Discord Slash Command Handlers
pub struct DiscordCommands {
    controller: Arc<Controller>,
}

impl DiscordCommands {
    /// Create handlers that publish through `controller`
    pub fn new(controller: Arc<Controller>) -> Self {
        Self { controller }
    }

    /// Global slash commands registered on Ready
    pub fn definitions() -> Vec<CreateCommand> {
        vec![CreateCommand::new(SETUP_COMMAND)
            .description("Post the RCON control panel (admin only)")
            .default_member_permissions(Permissions::ADMINISTRATOR)]
    }

    /// Dispatch a slash command by name
    pub async fn handle(&self, ctx: &Context, command: &CommandInteraction) {
        match command.data.name.as_str() {
            SETUP_COMMAND => self.handle_setup(ctx, command).await,
            _ => respond_ephemeral(ctx, command, "Unknown command").await,
        }
    }

    /// Owner-only: purge the invoking channel and post a fresh control panel there
    async fn handle_setup(&self, ctx: &Context, command: &CommandInteraction) {
        let owners = match ctx.http.get_current_application_info().await {
            Ok(info) => owner_ids(&info),
            Err(e) => {
                warn!(error = %e, "Failed to fetch application owner");
                Vec::new()
            }
        };

        if !is_owner(&owners, command.user.id.get()) {
            info!(user_id = %command.user.id, "Rejected {} from non-owner", SETUP_COMMAND);
            respond_ephemeral(ctx, command, PERMISSION_DENIED).await;
            return;
        }

        let responder = CommandResponder::new(&ctx.http, command);
        if let Err(e) = responder.defer_ephemeral().await {
            error!(error = %e, "Failed to acknowledge {}", SETUP_COMMAND);
            return;
        }

        let channel = DiscordChannel::new(ctx.http.clone(), command.channel_id);
        let reply = match self.controller.publish_panel(&channel).await {
            Ok(_) => PANEL_POSTED.to_string(),
            Err(e) => {
                error!(error = %e, "Failed to post control panel");
                format!("Failed to post the control panel: {}", e)
            }
        };

        if let Err(e) = responder.followup_ephemeral(reply).await {
            error!(error = %e, "Failed to reply to {}", SETUP_COMMAND);
        }
    }
}

/// User IDs allowed to run owner-only commands: the owner plus team members
fn owner_ids(info: &CurrentApplicationInfo) -> Vec<u64> {
    let mut ids: Vec<u64> = info.owner.iter().map(|u| u.id.get()).collect();
    if let Some(team) = &info.team {
        ids.extend(team.members.iter().map(|m| m.user.id.get()));
    }
    ids
}

/// Whether `user_id` is one of the application owners
#[must_use]
pub fn is_owner(owner_ids: &[u64], user_id: u64) -> bool {
    owner_ids.contains(&user_id)
}

async fn respond_ephemeral(ctx: &Context, command: &CommandInteraction, content: &str) {
    let builder = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    if let Err(e) = command.create_response(&ctx.http, builder).await {
        error!(error = %e, "Failed to respond to slash command");
    }
}
