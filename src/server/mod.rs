//! Server module for rconbot
//!
//! Contains the bot startup and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `init`: Bot initialization and run loop

pub mod config;
mod init;
mod loader;

// Re-export public API
pub use init::run;
pub use loader::load_config;
