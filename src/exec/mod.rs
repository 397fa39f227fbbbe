//! External command execution
//!
//! Every external tool invocation (git, npm, platform CLIs) goes through the
//! [`CommandRunner`] trait so gates and adapters can be exercised against a
//! scripted runner in tests. The runner takes a fully-formed argument vector,
//! never a shell string, and enforces a caller-supplied timeout by killing
//! the child process.

pub mod mock;

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

pub use mock::MockRunner;

/// Classification of a finished (or failed-to-finish) external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Exit code zero
    Success,
    /// Nonzero exit code
    Failure,
    /// Killed after the timeout elapsed
    TimedOut,
    /// The executable could not be spawned (typically: not found)
    SpawnError,
}

/// Captured result of one external command invocation.
///
/// Produced per invocation and never persisted. Both output streams are
/// decoded lossily; invalid byte sequences are replaced, never surfaced as
/// errors.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub status: OutcomeStatus,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn timed_out() -> Self {
        Self {
            status: OutcomeStatus::TimedOut,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn spawn_error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::SpawnError,
            exit_code: None,
            stdout: String::new(),
            stderr: message.into(),
        }
    }

    /// True only for a zero exit code.
    pub fn succeeded(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    /// Combined output for signature scanning ("missing script" etc.),
    /// stdout first.
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Executes external programs with captured output and a hard timeout.
///
/// Implementations must be deterministic in their own behavior: no internal
/// retries, no shell interpretation of arguments.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` in `cwd`, capturing both output streams.
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> CommandOutcome;

    /// Runs `program` with inherited stdio, for flows that need a real
    /// terminal (browser-based login). Output streams in the returned
    /// outcome are empty.
    async fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> CommandOutcome;
}

/// Real implementation over `tokio::process`.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> CommandOutcome {
        debug!(program, ?args, cwd = %cwd.display(), "Running command");

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program, error = %e, "Failed to spawn command");
                return CommandOutcome::spawn_error(format!("{}: {}", program, e));
            }
        };

        // Dropping the future on timeout kills the child (kill_on_drop).
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                if output.status.success() {
                    CommandOutcome {
                        status: OutcomeStatus::Success,
                        exit_code: Some(0),
                        stdout,
                        stderr,
                    }
                } else {
                    let code = output.status.code().unwrap_or(-1);
                    debug!(program, code, "Command exited nonzero");
                    CommandOutcome {
                        status: OutcomeStatus::Failure,
                        exit_code: Some(code),
                        stdout,
                        stderr,
                    }
                }
            }
            Ok(Err(e)) => CommandOutcome::spawn_error(format!("{}: {}", program, e)),
            Err(_) => {
                warn!(program, timeout_secs = timeout.as_secs(), "Command timed out");
                CommandOutcome::timed_out()
            }
        }
    }

    async fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> CommandOutcome {
        debug!(program, ?args, "Running interactive command");

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program, error = %e, "Failed to spawn interactive command");
                return CommandOutcome::spawn_error(format!("{}: {}", program, e));
            }
        };

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => CommandOutcome::success(""),
            Ok(Ok(status)) => {
                CommandOutcome::failure(status.code().unwrap_or(-1), "", "")
            }
            Ok(Err(e)) => CommandOutcome::spawn_error(format!("{}: {}", program, e)),
            Err(_) => {
                let _ = child.kill().await;
                CommandOutcome::timed_out()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        std::env::temp_dir()
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let outcome = SystemRunner
            .run("echo", &["hello"], &cwd(), Duration::from_secs(10))
            .await;

        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.stdout.trim(), "hello");
        assert!(outcome.succeeded());
    }

    #[tokio::test]
    async fn reports_nonzero_exit_as_failure() {
        let outcome = SystemRunner
            .run("sh", &["-c", "echo oops >&2; exit 3"], &cwd(), Duration::from_secs(10))
            .await;

        assert_eq!(outcome.status, OutcomeStatus::Failure);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stderr.trim(), "oops");
        assert!(!outcome.succeeded());
    }

    #[tokio::test]
    async fn missing_executable_is_spawn_error() {
        let outcome = SystemRunner
            .run(
                "definitely-not-a-real-binary-4f2a",
                &["--version"],
                &cwd(),
                Duration::from_secs(10),
            )
            .await;

        assert_eq!(outcome.status, OutcomeStatus::SpawnError);
        assert_eq!(outcome.exit_code, None);
        assert!(outcome.stderr.contains("definitely-not-a-real-binary-4f2a"));
    }

    #[tokio::test]
    async fn enforces_timeout() {
        let outcome = SystemRunner
            .run("sleep", &["30"], &cwd(), Duration::from_millis(100))
            .await;

        assert_eq!(outcome.status, OutcomeStatus::TimedOut);
        assert_eq!(outcome.exit_code, None);
    }

    #[test]
    fn combined_output_contains_both_streams() {
        let outcome = CommandOutcome::failure(1, "something", "npm ERR! missing script: build");
        let combined = outcome.combined_output();
        assert!(combined.contains("something"));
        assert!(combined.contains("missing script"));
    }
}
