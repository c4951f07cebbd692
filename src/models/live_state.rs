// ABOUTME: Snapshot pushed to the mobile client on every event-stream tick

use serde::{Deserialize, Serialize};

use super::TmuxSession;

/// tmux part of the snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TmuxState {
    pub sessions: Vec<TmuxSession>,
    pub current_session: Option<String>,
}

/// Aggregate state sampled fresh each tick; never diffed against the last one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStatePayload {
    /// Current branch, empty outside a repository
    pub branch: String,
    /// Repository root when inside one, otherwise the resolved directory
    pub path: String,
    pub tmux: TmuxState,
}
