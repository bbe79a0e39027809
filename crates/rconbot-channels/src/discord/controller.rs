//! Interaction controller
//!
//! Owns the session, posts the control message and turns a restart-button
//! activation into an acknowledged, answered restart. Platform calls go
//! through [`ControlChannel`] and [`ActivationResponder`] so the flow can run
//! without a gateway.

use super::ledger::InteractionLedger;
use super::panel::{ControlPanel, RESTART_BUTTON_ID};
use crate::error::Result;
use crate::util::format_restart_reply;
use async_trait::async_trait;
use rconbot_core::Restarter;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Most recent messages considered for purging
pub const PURGE_LIMIT: u8 = 100;

/// Discord refuses to bulk-delete messages older than this
pub const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60;

/// Reply sent when a restart is already running
pub const BUSY_MESSAGE: &str = "A restart is already in progress. Please wait for it to finish.";

/// A message found in the control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentMessage {
    /// Message ID
    pub id: u64,
    /// Creation time (unix seconds)
    pub created_at: i64,
}

/// Channel operations needed to manage the control message
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ControlChannel: Send + Sync {
    /// Channel ID
    fn id(&self) -> u64;

    /// Fetch up to `limit` of the most recent messages
    async fn recent_messages(&self, limit: u8) -> Result<Vec<RecentMessage>>;

    /// Bulk-delete messages
    async fn delete_messages(&self, ids: Vec<u64>) -> Result<()>;

    /// Post the control message, returning its ID
    async fn post_panel(&self, panel: &ControlPanel) -> Result<u64>;
}

/// Looks up the configured channel once the gateway is ready
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelResolver: Send + Sync {
    /// Resolve `channel_id` to a text-capable channel
    async fn resolve(&self, channel_id: u64) -> Result<Box<dyn ControlChannel>>;
}

/// Private response slot of a single activation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivationResponder: Send + Sync {
    /// Reserve the response with an ephemeral "thinking" state
    async fn defer_ephemeral(&self) -> Result<()>;

    /// Deliver the ephemeral follow-up
    async fn followup_ephemeral(&self, content: String) -> Result<()>;
}

/// A button press delivered by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEvent {
    /// Interaction ID, unique per delivery
    pub interaction_id: u64,
    /// Custom ID of the pressed control
    pub custom_id: String,
    /// Requesting user ID
    pub user_id: u64,
    /// Requesting user name
    pub user_name: String,
}

/// An activation that has not been acknowledged yet
pub struct PendingActivation<'a, R: ActivationResponder + ?Sized> {
    event: ActivationEvent,
    responder: &'a R,
}

impl<'a, R: ActivationResponder + ?Sized> PendingActivation<'a, R> {
    /// Wrap an event and its response slot
    pub fn new(event: ActivationEvent, responder: &'a R) -> Self {
        Self { event, responder }
    }

    /// Send the deferred acknowledgment. Consumes the pending activation.
    pub async fn acknowledge(self) -> Result<AcknowledgedActivation<'a, R>> {
        self.responder.defer_ephemeral().await?;
        Ok(AcknowledgedActivation {
            event: self.event,
            responder: self.responder,
        })
    }
}

/// An acknowledged activation awaiting its single reply
pub struct AcknowledgedActivation<'a, R: ActivationResponder + ?Sized> {
    event: ActivationEvent,
    responder: &'a R,
}

impl<'a, R: ActivationResponder + ?Sized> AcknowledgedActivation<'a, R> {
    /// The event being answered
    pub fn event(&self) -> &ActivationEvent {
        &self.event
    }

    /// Deliver the reply. Consumes the activation.
    pub async fn reply(self, content: String) -> Result<()> {
        self.responder.followup_ephemeral(content).await
    }
}

/// Why an activation was not processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not the restart button
    ForeignControl,
    /// Interaction already claimed
    Duplicate,
}

/// Result of handling one activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Dropped without acknowledgment or reply
    Ignored(IgnoreReason),
    /// Restart ran and the transcript was delivered
    Completed {
        /// Whether both stages succeeded
        succeeded: bool,
    },
    /// Another restart was running; the requester was told so
    Busy,
    /// Acknowledging or replying failed
    Failed,
}

/// Result of handling a Ready event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    /// A previous Ready already ran initialization
    AlreadyReady,
    /// Channel unavailable; nothing posted
    Degraded,
    /// Control message posted
    Published(u64),
    /// Channel resolved but posting failed
    PostFailed,
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for the gateway
    Connecting,
    /// Gateway authenticated, control message not yet posted
    Ready,
    /// Control message posted
    AwaitingInteraction,
    /// A restart is running
    Processing,
    /// Channel unavailable; connected but inert
    Degraded,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Ready => write!(f, "Ready"),
            Self::AwaitingInteraction => write!(f, "AwaitingInteraction"),
            Self::Processing => write!(f, "Processing"),
            Self::Degraded => write!(f, "Degraded"),
        }
    }
}

/// Process-wide session: lifecycle state plus the posted control message
pub struct Session {
    state: RwLock<ControllerState>,
    control_message: RwLock<Option<(u64, u64)>>,
}

impl Session {
    /// Create a session in the `Connecting` state
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ControllerState::Connecting),
            control_message: RwLock::new(None),
        }
    }

    /// Current lifecycle state
    pub async fn state(&self) -> ControllerState {
        *self.state.read().await
    }

    /// Move `Connecting → Ready`. Returns `false` on any later Ready event.
    pub async fn begin_ready(&self) -> bool {
        let mut state = self.state.write().await;
        if *state != ControllerState::Connecting {
            return false;
        }
        *state = ControllerState::Ready;
        true
    }

    /// Enter the terminal degraded state
    pub async fn mark_degraded(&self) {
        *self.state.write().await = ControllerState::Degraded;
    }

    /// Record the posted control message and start awaiting interactions
    pub async fn record_control_message(&self, channel_id: u64, message_id: u64) {
        *self.control_message.write().await = Some((channel_id, message_id));
        *self.state.write().await = ControllerState::AwaitingInteraction;
    }

    /// `(channel_id, message_id)` of the posted control message
    pub async fn control_message(&self) -> Option<(u64, u64)> {
        *self.control_message.read().await
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// IDs of messages young enough to bulk-delete
#[must_use]
pub fn purge_candidates(messages: &[RecentMessage], now: i64) -> Vec<u64> {
    messages
        .iter()
        .filter(|m| now - m.created_at < BULK_DELETE_MAX_AGE_SECS)
        .map(|m| m.id)
        .collect()
}

/// Drives the control message and restart activations
pub struct Controller {
    restarter: Arc<Restarter>,
    panel: ControlPanel,
    ledger: InteractionLedger,
    session: Session,
}

impl Controller {
    /// Create a controller
    #[must_use]
    pub fn new(restarter: Arc<Restarter>, panel: ControlPanel) -> Self {
        Self {
            restarter,
            panel,
            ledger: InteractionLedger::new(),
            session: Session::new(),
        }
    }

    /// Session state and control message reference
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Effective state; `Processing` while a restart runs
    pub async fn state(&self) -> ControllerState {
        match self.session.state().await {
            ControllerState::AwaitingInteraction if self.restarter.is_running() => {
                ControllerState::Processing
            }
            state => state,
        }
    }

    /// Handle gateway Ready: resolve the channel, then degrade or publish.
    ///
    /// Only the first Ready initializes; later ones (re-identify) are no-ops.
    pub async fn on_ready<S: ChannelResolver + ?Sized>(
        &self,
        resolver: &S,
        channel_id: u64,
    ) -> ReadyOutcome {
        if !self.session.begin_ready().await {
            debug!("Ready received again, control message already handled");
            return ReadyOutcome::AlreadyReady;
        }

        let channel = match resolver.resolve(channel_id).await {
            Ok(channel) => channel,
            Err(e) => {
                error!(channel_id = %channel_id, error = %e, "Channel not found or not text-based");
                self.session.mark_degraded().await;
                return ReadyOutcome::Degraded;
            }
        };

        match self.publish_panel(channel.as_ref()).await {
            Ok(message_id) => ReadyOutcome::Published(message_id),
            Err(e) => {
                error!(channel_id = %channel_id, error = %e, "Failed to post control message");
                ReadyOutcome::PostFailed
            }
        }
    }

    /// Best-effort removal of recent messages. Failures are logged, never returned.
    pub async fn purge<C: ControlChannel + ?Sized>(&self, channel: &C) -> usize {
        let messages = match channel.recent_messages(PURGE_LIMIT).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(channel_id = %channel.id(), error = %e, "Failed to fetch messages for purge");
                return 0;
            }
        };

        let ids = purge_candidates(&messages, chrono::Utc::now().timestamp());
        if ids.is_empty() {
            return 0;
        }

        let count = ids.len();
        match channel.delete_messages(ids).await {
            Ok(()) => {
                debug!(channel_id = %channel.id(), count, "Purged messages");
                count
            }
            Err(e) => {
                warn!(channel_id = %channel.id(), error = %e, "Failed to purge messages");
                0
            }
        }
    }

    /// Purge the channel and post a fresh control message
    pub async fn publish_panel<C: ControlChannel + ?Sized>(&self, channel: &C) -> Result<u64> {
        self.purge(channel).await;

        let message_id = channel.post_panel(&self.panel).await?;
        self.session
            .record_control_message(channel.id(), message_id)
            .await;

        info!(channel_id = %channel.id(), message_id = %message_id, "Control message posted");
        Ok(message_id)
    }

    /// Handle a button activation.
    ///
    /// Only the restart button is processed, and each interaction at most once.
    /// The acknowledgment is sent before any restart work.
    pub async fn handle_activation<R: ActivationResponder + ?Sized>(
        &self,
        event: ActivationEvent,
        responder: &R,
    ) -> ActivationOutcome {
        if event.custom_id != RESTART_BUTTON_ID {
            debug!(custom_id = %event.custom_id, "Ignoring foreign control");
            return ActivationOutcome::Ignored(IgnoreReason::ForeignControl);
        }
        if !self.ledger.claim(event.interaction_id) {
            debug!(interaction_id = %event.interaction_id, "Ignoring duplicate activation");
            return ActivationOutcome::Ignored(IgnoreReason::Duplicate);
        }

        info!(
            interaction_id = %event.interaction_id,
            user_id = %event.user_id,
            user = %event.user_name,
            "Restart requested"
        );

        let acknowledged = match PendingActivation::new(event, responder).acknowledge().await {
            Ok(acknowledged) => acknowledged,
            Err(e) => {
                error!(error = %e, "Failed to acknowledge restart request");
                return ActivationOutcome::Failed;
            }
        };

        let (content, outcome) = match self.restarter.try_restart().await {
            Some(transcript) => (
                format_restart_reply(&transcript.render()),
                ActivationOutcome::Completed {
                    succeeded: transcript.succeeded(),
                },
            ),
            None => {
                info!(user_id = %acknowledged.event().user_id, "Restart already in progress");
                (BUSY_MESSAGE.to_string(), ActivationOutcome::Busy)
            }
        };

        if let Err(e) = acknowledged.reply(content).await {
            error!(error = %e, "Failed to deliver restart reply");
            return ActivationOutcome::Failed;
        }
        outcome
    }
}
