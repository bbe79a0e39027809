//! CLI module for rconbot
//!
//! Provides commands:
//! - `serve`: Run the Discord bot (default)
//! - `restart`: Restart the services once from the terminal
//! - `check`: Validate configuration and print the effective settings

use clap::{Parser, Subcommand};

pub mod check;
pub mod restart;

/// rconbot CLI
#[derive(Parser, Debug)]
#[command(name = "rconbot")]
#[command(about = "Discord button that restarts the CRCON containers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Discord bot (default)
    Serve,
    /// Run the stop/start sequence once and print the transcript
    Restart,
    /// Validate configuration
    Check,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => crate::server::run().await,
        Commands::Restart => restart::run().await,
        Commands::Check => check::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["rconbot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["rconbot", "restart"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Restart)));

        let cli = Cli::try_parse_from(["rconbot", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));

        assert!(Cli::try_parse_from(["rconbot", "bogus"]).is_err());
    }
}
