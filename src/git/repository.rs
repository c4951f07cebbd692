// ABOUTME: Repository detection and toplevel resolution through the git CLI

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::exec::{CommandExecutor, CommandResult};

/// Run `git <args>` inside `cwd`
pub(crate) async fn run_git(
    executor: &dyn CommandExecutor,
    cwd: &Path,
    args: &[&str],
) -> CommandResult {
    executor.run("git", args, Some(cwd)).await
}

/// Answers "is this a repository, and where is its root"
#[derive(Clone)]
pub struct RepositoryProbe {
    executor: Arc<dyn CommandExecutor>,
}

impl RepositoryProbe {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    pub async fn is_git_repo(&self, path: &Path) -> bool {
        let result = run_git(self.executor.as_ref(), path, &["rev-parse", "--git-dir"]).await;
        if !result.succeeded() {
            debug!("{} is not a git repository: {}", path.display(), result.diagnostic());
        }
        result.succeeded()
    }

    /// Toplevel of the working tree containing `path`, or `path` itself when
    /// git cannot say
    pub async fn git_root(&self, path: &Path) -> PathBuf {
        run_git(self.executor.as_ref(), path, &["rev-parse", "--show-toplevel"])
            .await
            .usable_stdout()
            .map_or_else(|| path.to_path_buf(), PathBuf::from)
    }
}
