// ABOUTME: Timer-driven sampling loop pushing live state to one connected client
//
// Per connection: OPEN -> {SAMPLE -> SERIALIZE -> PUSH -> WAIT}* -> CLOSED.
// The first sample goes out immediately; after that one per interval. A failed
// push (the receiving side is gone) is the only way out of the loop.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::cwd::CwdResolver;
use crate::error::BridgeError;
use crate::git::{BranchManager, RepositoryProbe};
use crate::models::{LiveStatePayload, TmuxState};
use crate::tmux::SessionManager;

/// Pause between two samples on one connection
pub const DEFAULT_EVENT_INTERVAL: Duration = Duration::from_secs(3);

/// Shortest pause the loop accepts; anything below is raised to this
pub const MIN_EVENT_INTERVAL: Duration = Duration::from_secs(1);

/// Produces one fresh snapshot per call
#[async_trait]
pub trait StateSource: Send + Sync {
    async fn sample(&self) -> LiveStatePayload;
}

/// Samples cwd, branch and tmux state from the live system
pub struct LiveStateSampler {
    cwd: Arc<CwdResolver>,
    probe: RepositoryProbe,
    branches: BranchManager,
    sessions: SessionManager,
}

impl LiveStateSampler {
    pub fn new(
        cwd: Arc<CwdResolver>,
        probe: RepositoryProbe,
        branches: BranchManager,
        sessions: SessionManager,
    ) -> Self {
        Self {
            cwd,
            probe,
            branches,
            sessions,
        }
    }
}

#[async_trait]
impl StateSource for LiveStateSampler {
    async fn sample(&self) -> LiveStatePayload {
        let cwd = self.cwd.resolve().await;

        let (branch, path) = if self.probe.is_git_repo(&cwd).await {
            let root = self.probe.git_root(&cwd).await;
            let branch = self.branches.current_branch(&root).await;
            (branch, root)
        } else {
            (String::new(), cwd)
        };

        let (sessions, current_session) = tokio::join!(
            self.sessions.list_sessions(),
            self.sessions.current_session()
        );

        LiveStatePayload {
            branch,
            path: path.display().to_string(),
            tmux: TmuxState {
                sessions,
                current_session,
            },
        }
    }
}

/// Drives one connection's sampling loop
pub struct LiveStateBroadcaster {
    source: Arc<dyn StateSource>,
    interval: Duration,
}

impl LiveStateBroadcaster {
    pub fn new(source: Arc<dyn StateSource>, interval: Duration) -> Self {
        Self {
            source,
            interval: interval.max(MIN_EVENT_INTERVAL),
        }
    }

    /// Start the loop on its own task and hand back the stream of serialized
    /// payloads. Dropping the stream stops the loop at its next push.
    pub fn spawn(self) -> ReceiverStream<String> {
        // Capacity 1 keeps the loop paced by the reader as well as the timer
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move { self.run(tx).await });
        ReceiverStream::new(rx)
    }

    /// Sample and push until the receiver is gone
    pub async fn run(&self, sink: mpsc::Sender<String>) {
        let mut ticks: u64 = 0;
        loop {
            let payload = self.source.sample().await;

            match serde_json::to_string(&payload) {
                Ok(json) => {
                    if let Err(e) = Self::push(&sink, json).await {
                        debug!("Live state stream closed after {} events: {}", ticks, e);
                        return;
                    }
                    ticks += 1;
                }
                Err(e) => warn!("Failed to serialize live state: {}", e),
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    async fn push(sink: &mpsc::Sender<String>, json: String) -> Result<(), BridgeError> {
        sink.send(json)
            .await
            .map_err(|_| BridgeError::StreamDisconnected)
    }
}
