// ABOUTME: tmux session lifecycle driven on behalf of the attached mobile client
//
// Manages:
// - Session enumeration with window counts and attach state
// - Which session the remote user's client is showing
// - Create / switch / kill, always targeting the recorded client tty

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::environment::EnvironmentStateProvider;
use crate::exec::CommandExecutor;
use crate::models::{OperationOutcome, TmuxSession};
use crate::tmux::client::{exact_session_target, TmuxClientQuery};

/// Failure message when the terminal wrapper has not recorded a client tty
pub const NO_CLIENT_TTY: &str = "No client tty found";

const LIST_FORMAT: &str = "#{session_name}:#{session_windows}:#{session_attached}";

/// Session operations scoped to the recorded client terminal
#[derive(Clone)]
pub struct SessionManager {
    executor: Arc<dyn CommandExecutor>,
    environment: Arc<dyn EnvironmentStateProvider>,
    clients: TmuxClientQuery,
}

impl SessionManager {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        environment: Arc<dyn EnvironmentStateProvider>,
    ) -> Self {
        let clients = TmuxClientQuery::new(Arc::clone(&executor));
        Self {
            executor,
            environment,
            clients,
        }
    }

    /// All sessions on the tmux server; empty when no server is running
    pub async fn list_sessions(&self) -> Vec<TmuxSession> {
        let result = self
            .executor
            .run("tmux", &["list-sessions", "-F", LIST_FORMAT], None)
            .await;

        if !result.succeeded() {
            debug!("No tmux sessions listed: {}", result.diagnostic());
            return Vec::new();
        }

        result
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let parsed = TmuxSession::parse_list_line(line);
                if parsed.is_none() {
                    debug!("Skipping malformed tmux session line: {:?}", line);
                }
                parsed
            })
            .collect()
    }

    /// Session shown by the recorded client, if it is known and attached
    pub async fn current_session(&self) -> Option<String> {
        let tty = self.environment.attached_client_device()?;
        self.clients.session_for_client(&tty).await
    }

    /// Create a detached session and move the client onto it.
    ///
    /// A creation error (typically "duplicate session") is tolerated; the
    /// outcome is decided by the switch.
    pub async fn create(&self, name: &str, start_dir: Option<&Path>) -> OperationOutcome {
        let mut args = vec!["new-session", "-d", "-s", name];
        let start_dir = start_dir.and_then(Path::to_str);
        if let Some(dir) = start_dir {
            args.extend(["-c", dir]);
        }

        let created = self.executor.run("tmux", &args, None).await;
        if created.succeeded() {
            info!("Created tmux session '{}'", name);
        } else {
            debug!(
                "tmux new-session '{}' did not succeed, switching anyway: {}",
                name,
                created.diagnostic()
            );
        }

        let switched = self.switch(name).await;
        if switched.success {
            OperationOutcome::succeeded(format!("Session '{name}' created"))
        } else {
            switched
        }
    }

    /// Point the recorded client at `name`
    pub async fn switch(&self, name: &str) -> OperationOutcome {
        let Some(tty) = self.environment.attached_client_device() else {
            return OperationOutcome::failed(NO_CLIENT_TTY);
        };

        if !self.clients.is_attached(&tty).await {
            return OperationOutcome::failed(format!("Client tty {tty} is not attached to tmux"));
        }

        let target = exact_session_target(name);
        let result = self
            .executor
            .run("tmux", &["switch-client", "-c", &tty, "-t", &target], None)
            .await;

        if result.succeeded() {
            info!("Switched client {} to tmux session '{}'", tty, name);
            OperationOutcome::succeeded(format!("Switched to session '{name}'"))
        } else {
            warn!(
                "Failed to switch client {} to '{}': {}",
                tty,
                name,
                result.diagnostic()
            );
            OperationOutcome::from_failed_command(&result)
        }
    }

    /// Kill the named session; false on any failure including timeout
    pub async fn kill(&self, name: &str) -> bool {
        let target = exact_session_target(name);
        let result = self
            .executor
            .run("tmux", &["kill-session", "-t", &target], None)
            .await;

        if result.succeeded() {
            info!("Killed tmux session '{}'", name);
        } else {
            warn!("Failed to kill tmux session '{}': {}", name, result.diagnostic());
        }
        result.succeeded()
    }
}
