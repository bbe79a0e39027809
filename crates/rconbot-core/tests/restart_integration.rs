//! Restart Integration Tests
//!
//! Runs the real process executor against `sh` instead of docker.

#![cfg(unix)]

use rconbot_core::{CommandSpec, RestartConfig, Restarter, NO_OUTPUT_PLACEHOLDER};
use std::sync::Arc;

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh", ["-c", script])
}

fn restarter(down: &str, up: &str) -> Restarter {
    let config = RestartConfig::default()
        .with_working_dir(Some(env!("CARGO_MANIFEST_DIR")))
        .with_commands(sh(down), sh(up));
    Restarter::new(config)
}

#[tokio::test]
async fn test_real_commands_produce_expected_transcript() {
    let transcript = restarter("echo Stopped.", "echo Started.").restart().await;

    assert!(transcript.succeeded());
    assert_eq!(
        transcript.render(),
        "Stopping containers...\nStopped.\n\nStarting containers...\nStarted.\n"
    );
}

#[tokio::test]
async fn test_commands_run_in_working_dir() {
    let transcript = restarter("test -f Cargo.toml && echo found", "true")
        .restart()
        .await;

    assert!(transcript.render().contains("found"), "{}", transcript);
}

#[tokio::test]
async fn test_start_attempted_after_stop_fails() {
    let transcript = restarter("echo boom >&2; exit 2", "echo Started.")
        .restart()
        .await;
    let text = transcript.render();

    assert!(!transcript.succeeded());
    assert!(text.contains("Failed: sh -c echo boom >&2; exit 2 exited with code 2"));
    assert!(text.contains("boom"));
    assert!(text.ends_with("Starting containers...\nStarted.\n"));
}

#[tokio::test]
async fn test_missing_program_captured_not_raised() {
    let config = RestartConfig::default()
        .with_working_dir(Some(env!("CARGO_MANIFEST_DIR")))
        .with_commands(
            CommandSpec::new("rconbot-no-such-program", Vec::<String>::new()),
            sh("echo Started."),
        );
    let text = Restarter::new(config).restart().await.render();

    assert!(text.contains("\nFailed: "));
    assert!(text.contains("Started."));
    assert_ne!(text, NO_OUTPUT_PLACEHOLDER);
}

#[tokio::test]
async fn test_concurrent_restarts_are_serialized() {
    let restarter = Arc::new(restarter("sleep 1; echo Stopped.", "echo Started."));

    let first = {
        let restarter = restarter.clone();
        tokio::spawn(async move { restarter.try_restart().await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert!(restarter.is_running());
    assert!(restarter.try_restart().await.is_none());

    let first = first.await.unwrap().expect("first restart ran");
    assert!(first.succeeded());
    assert!(!restarter.is_running());
}
