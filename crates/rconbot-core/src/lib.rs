//! rconbot Core - Restart Runner
//!
//! Runs the compose stack's stop and start commands in sequence and captures
//! their output as a transcript for the requester.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod restart;
pub mod runner;

pub use config::{CommandSpec, RestartConfig, DEFAULT_WORKING_DIR};
pub use error::{Error, Result};
pub use restart::{Fragment, RestartTranscript, Restarter, Stage, NO_OUTPUT_PLACEHOLDER};
pub use runner::{CommandExecutor, CommandOutput, ProcessExecutor};
