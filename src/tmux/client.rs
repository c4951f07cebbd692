// ABOUTME: tmux client lookups keyed by terminal device
//
// The remote user's shell runs inside a tmux client whose tty the terminal
// wrapper records. These queries map that tty to its session, its active pane
// directory, and its attachment status.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::exec::CommandExecutor;

/// Read-only tmux queries about one client terminal
/// `-t` value matching only the session named exactly `name`. A bare name
/// falls back to prefix matching in tmux.
pub fn exact_session_target(name: &str) -> String {
    format!("={name}")
}

#[derive(Clone)]
pub struct TmuxClientQuery {
    executor: Arc<dyn CommandExecutor>,
}

impl TmuxClientQuery {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Session the client on `tty` is currently showing
    pub async fn session_for_client(&self, tty: &str) -> Option<String> {
        let result = self
            .executor
            .run(
                "tmux",
                &["display-message", "-p", "-c", tty, "#{session_name}"],
                None,
            )
            .await;

        let session = result.usable_stdout().map(str::to_string);
        if session.is_none() {
            debug!("No tmux session for client {}: {}", tty, result.diagnostic());
        }
        session
    }

    /// Current directory of the active pane in `session`
    pub async fn pane_current_path(&self, session: &str) -> Option<PathBuf> {
        // Trailing colon: the session's current window and pane
        let target = format!("{}:", exact_session_target(session));
        let result = self
            .executor
            .run(
                "tmux",
                &["display-message", "-p", "-t", &target, "#{pane_current_path}"],
                None,
            )
            .await;

        result.usable_stdout().map(PathBuf::from)
    }

    /// Terminal devices of every client attached to the tmux server
    pub async fn attached_clients(&self) -> Vec<String> {
        let result = self
            .executor
            .run("tmux", &["list-clients", "-F", "#{client_tty}"], None)
            .await;

        result
            .usable_stdout()
            .map(|out| {
                out.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn is_attached(&self, tty: &str) -> bool {
        self.attached_clients().await.iter().any(|client| client == tty)
    }
}
