//! Discord - serenity adapter

pub mod adapter;
pub mod commands;
pub mod config;
pub mod controller;
pub mod handler;
pub mod ledger;
pub mod panel;

pub use adapter::DiscordAdapter;
pub use config::DiscordConfig;
pub use controller::{
    ActivationEvent, ActivationOutcome, ActivationResponder, ChannelResolver, ControlChannel,
    Controller, ControllerState, IgnoreReason, ReadyOutcome, Session,
};
pub use panel::{ControlPanel, RESTART_BUTTON_ID};
