// ABOUTME: Resolves the directory the remote user is working in
//
// Strategies are tried in order and the first one that yields a path wins:
// 1. The active pane of the session owning the recorded client tty
// 2. The last directory the terminal wrapper recorded
// 3. The home directory

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::environment::EnvironmentStateProvider;
use crate::exec::CommandExecutor;
use crate::tmux::TmuxClientQuery;

/// One way of finding the working directory
#[async_trait]
pub trait CwdStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self) -> Option<PathBuf>;
}

/// Pane directory of the session the recorded client is attached to
pub struct AttachedClientPane {
    environment: Arc<dyn EnvironmentStateProvider>,
    clients: TmuxClientQuery,
}

impl AttachedClientPane {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        environment: Arc<dyn EnvironmentStateProvider>,
    ) -> Self {
        Self {
            environment,
            clients: TmuxClientQuery::new(executor),
        }
    }
}

#[async_trait]
impl CwdStrategy for AttachedClientPane {
    fn name(&self) -> &'static str {
        "attached-client-pane"
    }

    async fn resolve(&self) -> Option<PathBuf> {
        let tty = self.environment.attached_client_device()?;
        let session = self.clients.session_for_client(&tty).await?;
        self.clients.pane_current_path(&session).await
    }
}

/// Directory persisted by the terminal wrapper
pub struct LastKnownDirectory {
    environment: Arc<dyn EnvironmentStateProvider>,
}

impl LastKnownDirectory {
    pub fn new(environment: Arc<dyn EnvironmentStateProvider>) -> Self {
        Self { environment }
    }
}

#[async_trait]
impl CwdStrategy for LastKnownDirectory {
    fn name(&self) -> &'static str {
        "last-known-directory"
    }

    async fn resolve(&self) -> Option<PathBuf> {
        self.environment.last_known_path()
    }
}

pub struct HomeDirectory;

#[async_trait]
impl CwdStrategy for HomeDirectory {
    fn name(&self) -> &'static str {
        "home-directory"
    }

    async fn resolve(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Ordered strategy chain
pub struct CwdResolver {
    strategies: Vec<Box<dyn CwdStrategy>>,
}

impl CwdResolver {
    pub fn new(strategies: Vec<Box<dyn CwdStrategy>>) -> Self {
        Self { strategies }
    }

    /// Client pane, then last-known directory, then home
    pub fn standard(
        executor: Arc<dyn CommandExecutor>,
        environment: Arc<dyn EnvironmentStateProvider>,
    ) -> Self {
        Self::new(vec![
            Box::new(AttachedClientPane::new(executor, Arc::clone(&environment))),
            Box::new(LastKnownDirectory::new(environment)),
            Box::new(HomeDirectory),
        ])
    }

    /// First path any strategy yields, `/` if none does
    pub async fn resolve(&self) -> PathBuf {
        for strategy in &self.strategies {
            if let Some(path) = strategy.resolve().await {
                debug!("Resolved cwd via {}: {}", strategy.name(), path.display());
                return path;
            }
            debug!("cwd strategy {} yielded nothing", strategy.name());
        }
        PathBuf::from("/")
    }
}
