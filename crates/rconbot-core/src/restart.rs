//! Restart runner
//!
//! Brings the compose stack down and back up, recording everything the two
//! commands print into a [`RestartTranscript`]. The runner never fails
//! outward: launch errors and non-zero exits become failure notes.

use crate::config::{CommandSpec, RestartConfig};
use crate::runner::{CommandExecutor, ProcessExecutor};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Text returned when a restart produced no output at all
pub const NO_OUTPUT_PLACEHOLDER: &str = "No output captured.";

/// Restart stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Bring services down
    Stop,
    /// Bring services back up
    Start,
}

impl Stage {
    /// Both stages in the order they run
    pub const ALL: [Stage; 2] = [Stage::Stop, Stage::Start];

    /// Human-readable label written before the stage output
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Stop => "Stopping containers...",
            Self::Start => "Starting containers...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Start => write!(f, "start"),
        }
    }
}

/// One piece of a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A stage began
    Label(Stage),
    /// Captured stdout or stderr text
    Output(String),
    /// A stage failed; holds the error message
    Failure(String),
}

/// Ordered record of one restart attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartTranscript {
    fragments: Vec<Fragment>,
}

impl RestartTranscript {
    /// Create an empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a stage
    pub fn push_label(&mut self, stage: Stage) {
        self.fragments.push(Fragment::Label(stage));
    }

    /// Record captured text; empty text is dropped
    pub fn push_output(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.fragments.push(Fragment::Output(text));
        }
    }

    /// Record a stage failure
    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.fragments.push(Fragment::Failure(message.into()));
    }

    /// Fragments in the order they were recorded
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Whether every stage finished without a failure note
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self
            .fragments
            .iter()
            .any(|f| matches!(f, Fragment::Failure(_)))
    }

    /// Render the transcript as display text.
    ///
    /// Never empty: falls back to [`NO_OUTPUT_PLACEHOLDER`].
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Label(stage) => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(stage.label());
                    out.push('\n');
                }
                Fragment::Output(text) => out.push_str(text),
                Fragment::Failure(message) => {
                    out.push_str("\nFailed: ");
                    out.push_str(message);
                    out.push('\n');
                }
            }
        }

        if out.is_empty() {
            NO_OUTPUT_PLACEHOLDER.to_string()
        } else {
            out
        }
    }
}

impl fmt::Display for RestartTranscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Runs the two-stage restart, one at a time
pub struct Restarter {
    config: RestartConfig,
    executor: Arc<dyn CommandExecutor>,
    in_flight: Mutex<()>,
}

impl Restarter {
    /// Create a restarter that spawns real processes
    #[must_use]
    pub fn new(config: RestartConfig) -> Self {
        Self::with_executor(config, Arc::new(ProcessExecutor))
    }

    /// Create a restarter with a custom executor
    #[must_use]
    pub fn with_executor(config: RestartConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            config,
            executor,
            in_flight: Mutex::new(()),
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &RestartConfig {
        &self.config
    }

    /// Whether a restart is currently running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Run a restart, waiting for any in-flight restart to finish first
    pub async fn restart(&self) -> RestartTranscript {
        let _guard = self.in_flight.lock().await;
        self.run_stages().await
    }

    /// Run a restart unless one is already in flight.
    ///
    /// Returns `None` without touching any process when another restart holds the guard.
    pub async fn try_restart(&self) -> Option<RestartTranscript> {
        let _guard = self.in_flight.try_lock().ok()?;
        Some(self.run_stages().await)
    }

    async fn run_stages(&self) -> RestartTranscript {
        info!(working_dir = %self.config.working_dir.display(), "Restarting services");

        let mut transcript = RestartTranscript::new();
        // Start always runs, even when stop failed.
        for stage in Stage::ALL {
            self.run_stage(stage, &mut transcript).await;
        }

        if transcript.succeeded() {
            info!("Restart completed");
        } else {
            warn!("Restart completed with failures");
        }
        transcript
    }

    async fn run_stage(&self, stage: Stage, transcript: &mut RestartTranscript) {
        let command = self.command_for(stage);
        transcript.push_label(stage);

        match self.executor.execute(command, &self.config.working_dir).await {
            Ok(output) if output.is_success() => {
                transcript.push_output(output.stdout);
                transcript.push_output(output.stderr);
            }
            Ok(output) => {
                let code = output
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                warn!(stage = %stage, command = %command, exit_code = %code, "Restart stage exited non-zero");
                transcript.push_failure(format!("{} exited with code {}", command, code));
                transcript.push_output(output.stdout);
                transcript.push_output(output.stderr);
            }
            Err(e) => {
                warn!(stage = %stage, command = %command, error = %e, "Restart stage failed");
                transcript.push_failure(e.to_string());
            }
        }
    }

    fn command_for(&self, stage: Stage) -> &CommandSpec {
        match stage {
            Stage::Stop => &self.config.down,
            Stage::Start => &self.config.up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::runner::{CommandOutput, MockCommandExecutor};
    use mockall::Sequence;

    fn restarter(mock: MockCommandExecutor) -> Restarter {
        Restarter::with_executor(RestartConfig::default(), Arc::new(mock))
    }

    #[test]
    fn test_empty_transcript_renders_placeholder() {
        assert_eq!(RestartTranscript::new().render(), NO_OUTPUT_PLACEHOLDER);
    }

    #[test]
    fn test_empty_output_is_dropped() {
        let mut transcript = RestartTranscript::new();
        transcript.push_output("");
        assert!(transcript.fragments().is_empty());
    }

    #[tokio::test]
    async fn test_both_stages_succeed() {
        let mut mock = MockCommandExecutor::new();
        let mut seq = Sequence::new();
        mock.expect_execute()
            .withf(|cmd, _| cmd.args == ["compose", "down"])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::success("Stopped.\n")));
        mock.expect_execute()
            .withf(|cmd, _| cmd.args.contains(&"--remove-orphans".to_string()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::success("Started.\n")));

        let transcript = restarter(mock).restart().await;
        assert!(transcript.succeeded());
        assert_eq!(
            transcript.render(),
            "Stopping containers...\nStopped.\n\nStarting containers...\nStarted.\n"
        );
    }

    #[tokio::test]
    async fn test_start_runs_after_stop_launch_failure() {
        let mut mock = MockCommandExecutor::new();
        let mut seq = Sequence::new();
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::Launch("ENOENT".to_string())));
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::success("Started.\n")));

        let text = restarter(mock).restart().await.render();
        let failed_at = text.find("Failed: ENOENT").expect("failure note");
        let started_at = text.find("Started.").expect("start output");
        assert!(failed_at < started_at);
        assert!(text.contains("Starting containers..."));
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_partial_output() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute().times(2).returning(|cmd, _| {
            if cmd.args.first().map(String::as_str) == Some("compose")
                && cmd.args.get(1).map(String::as_str) == Some("down")
            {
                Ok(CommandOutput {
                    stdout: "partial\n".to_string(),
                    stderr: "no such service\n".to_string(),
                    exit_code: Some(1),
                })
            } else {
                Err(Error::Launch("permission denied".to_string()))
            }
        });

        let transcript = restarter(mock).restart().await;
        assert!(!transcript.succeeded());
        let text = transcript.render();
        assert!(text.contains("Failed: docker compose down exited with code 1\npartial\nno such service\n"));
        assert!(text.ends_with("Starting containers...\n\nFailed: permission denied\n"));
    }

    #[tokio::test]
    async fn test_stderr_follows_stdout() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute().times(2).returning(|_, _| {
            Ok(CommandOutput {
                stdout: "out\n".to_string(),
                stderr: "err\n".to_string(),
                exit_code: Some(0),
            })
        });

        let text = restarter(mock).restart().await.render();
        assert_eq!(
            text,
            "Stopping containers...\nout\nerr\n\nStarting containers...\nout\nerr\n"
        );
    }

    #[tokio::test]
    async fn test_try_restart_rejects_while_running() {
        let mock = MockCommandExecutor::new();
        let restarter = restarter(mock);

        let _held = restarter.in_flight.lock().await;
        assert!(restarter.is_running());
        assert!(restarter.try_restart().await.is_none());
    }
}
