//! rconbot Channels - Discord Control Panel
//!
//! Posts the restart control message to a Discord channel and answers
//! button activations with the restart transcript (via serenity).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod discord;
pub mod error;
pub mod util;

pub use error::{Error, Result};

pub use discord::{ControlPanel, Controller, DiscordAdapter, DiscordConfig};
