//! External command execution
//!
//! Spawns a stage command in the compose directory and collects its output.
//! No timeout is applied here; a stuck command holds the restart until it exits.

use crate::config::CommandSpec;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
    /// Exit code (`None` when terminated by a signal)
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Output of a command that exited 0
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Whether the command exited with status 0
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command to completion.
///
/// `Err` means the command never produced an exit status (launch or wait
/// failure). A non-zero exit is reported through [`CommandOutput::exit_code`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute `command` with `cwd` as its working directory
    async fn execute(&self, command: &CommandSpec, cwd: &Path) -> Result<CommandOutput>;
}

/// Executes commands as local child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, command: &CommandSpec, cwd: &Path) -> Result<CommandOutput> {
        run_command(command, cwd).await
    }
}

/// Spawn `command` in `cwd` and wait for it, capturing stdout and stderr separately
pub async fn run_command(command: &CommandSpec, cwd: &Path) -> Result<CommandOutput> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args);
    cmd.current_dir(cwd);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| Error::Launch(e.to_string()))?;

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| Error::Execution(e.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code();

    debug!(
        command = %command,
        exit_code = ?exit_code,
        stdout_len = stdout.len(),
        stderr_len = stderr.len(),
        "Command finished"
    );

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
    })
}
