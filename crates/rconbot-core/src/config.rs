//! Restart configuration
//!
//! Describes where the compose stack lives and which two commands bring it
//! down and back up.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Working directory used when `CRCON_PATH` is unset or blank
pub const DEFAULT_WORKING_DIR: &str = "/root/hll_rcon_tool";

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments passed verbatim (no shell)
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command from a program and its arguments
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Restart runner configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RestartConfig {
    /// Directory both stages run in
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    /// Stage 1: bring services down
    #[serde(default = "default_down")]
    pub down: CommandSpec,
    /// Stage 2: bring services up, removing orphans
    #[serde(default = "default_up")]
    pub up: CommandSpec,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORKING_DIR)
}

fn default_down() -> CommandSpec {
    CommandSpec::new("docker", ["compose", "down"])
}

fn default_up() -> CommandSpec {
    CommandSpec::new("docker", ["compose", "up", "-d", "--remove-orphans"])
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            down: default_down(),
            up: default_up(),
        }
    }
}

impl RestartConfig {
    /// Set the working directory from a raw setting.
    ///
    /// The value is trimmed; a missing or blank value keeps the default path.
    #[must_use]
    pub fn with_working_dir(mut self, raw: Option<&str>) -> Self {
        self.working_dir = resolve_working_dir(raw);
        self
    }

    /// Override both stage commands
    #[must_use]
    pub fn with_commands(mut self, down: CommandSpec, up: CommandSpec) -> Self {
        self.down = down;
        self.up = up;
        self
    }
}

/// Resolve a raw working-directory setting, falling back to [`DEFAULT_WORKING_DIR`]
#[must_use]
pub fn resolve_working_dir(raw: Option<&str>) -> PathBuf {
    match raw.map(str::trim) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => default_working_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commands() {
        let config = RestartConfig::default();
        assert_eq!(config.working_dir, PathBuf::from("/root/hll_rcon_tool"));
        assert_eq!(config.down.to_string(), "docker compose down");
        assert_eq!(
            config.up.to_string(),
            "docker compose up -d --remove-orphans"
        );
    }

    #[test]
    fn test_blank_working_dir_falls_back() {
        assert_eq!(resolve_working_dir(None), PathBuf::from(DEFAULT_WORKING_DIR));
        assert_eq!(
            resolve_working_dir(Some("   ")),
            PathBuf::from(DEFAULT_WORKING_DIR)
        );
        assert_eq!(
            resolve_working_dir(Some("  /srv/crcon \n")),
            PathBuf::from("/srv/crcon")
        );
    }

    #[test]
    fn test_with_commands() {
        let config = RestartConfig::default()
            .with_working_dir(Some("/tmp"))
            .with_commands(
                CommandSpec::new("sh", ["-c", "echo down"]),
                CommandSpec::new("sh", ["-c", "echo up"]),
            );
        assert_eq!(config.working_dir, PathBuf::from("/tmp"));
        assert_eq!(config.down.program, "sh");
        assert_eq!(config.up.args, vec!["-c", "echo up"]);
    }
}
