// ABOUTME: Bounded external command execution shared by every git and tmux call
//
// Every component reaches git and tmux through `CommandExecutor`; nothing else
// spawns processes. A non-zero exit or a timeout is a value, never an error, so
// callers decide per call site what "no usable output" degrades to.

use async_trait::async_trait;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;


/// Upper bound for a single external invocation.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Exit code reported when the process never produced one (timeout, signal,
/// spawn failure).
pub const NO_EXIT_CODE: i32 = -1;

/// Outcome of one external invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandResult {
    /// Result for an invocation that exceeded the timeout. Output is discarded.
    pub fn timeout() -> Self {
        Self {
            exit_code: NO_EXIT_CODE,
            timed_out: true,
            ..Self::default()
        }
    }

    /// Result for a process that could not be started at all
    pub fn spawn_failure(err: &std::io::Error) -> Self {
        Self {
            exit_code: NO_EXIT_CODE,
            stderr: err.to_string(),
            ..Self::default()
        }
    }

    /// Successful exit with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Failed exit with the given stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }

    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Trimmed stdout of a successful run, `None` when the run failed or
    /// printed nothing.
    pub fn usable_stdout(&self) -> Option<&str> {
        if !self.succeeded() {
            return None;
        }
        let out = self.stdout_trimmed();
        (!out.is_empty()).then_some(out)
    }

    /// Human-readable reason for a failed run: "Timeout", the tool's stderr
    /// verbatim, or the exit code when the tool said nothing.
    pub fn diagnostic(&self) -> String {
        if self.timed_out {
            return "Timeout".to_string();
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("exited with code {}", self.exit_code)
    }
}

/// Variables added to a program's environment. git must never block on a
/// credential prompt.
fn extra_env(program: &str) -> &'static [(&'static str, &'static str)] {
    match program {
        "git" => &[("GIT_TERMINAL_PROMPT", "0")],
        _ => &[],
    }
}

/// Runs external programs with a working directory under a fixed timeout.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> CommandResult;
}

/// Production executor backed by `tokio::process`
#[derive(Debug, Clone)]
pub struct TokioCommandExecutor {
    timeout: Duration,
}

impl TokioCommandExecutor {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TokioCommandExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

#[async_trait]
impl CommandExecutor for TokioCommandExecutor {
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> CommandResult {
        let started = Instant::now();

        let mut command = Command::new(program);
        command
            .args(args)
            .envs(extra_env(program).iter().copied())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        // Dropping the output future on timeout kills the child
        let result = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => CommandResult::timeout(),
            Ok(Err(e)) => CommandResult::spawn_failure(&e),
            Ok(Ok(output)) => CommandResult {
                exit_code: output.status.code().unwrap_or(NO_EXIT_CODE),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                timed_out: false,
            },
        };

        debug!(
            program,
            ?args,
            exit_code = result.exit_code,
            timed_out = result.timed_out,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "external command finished"
        );
        result
    }
}
