// ABOUTME: Branch enumeration and checkout through the git CLI

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::exec::CommandExecutor;
use crate::git::repository::run_git;
use crate::models::{BranchSet, OperationOutcome};

/// Branch name reported when the current branch cannot be determined
pub const UNKNOWN_BRANCH: &str = "unknown";

#[derive(Clone)]
pub struct BranchManager {
    executor: Arc<dyn CommandExecutor>,
}

impl BranchManager {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Current branch, `"unknown"` when git fails. Detached HEAD is empty.
    pub async fn current_branch(&self, path: &Path) -> String {
        self.show_current(path)
            .await
            .unwrap_or_else(|| UNKNOWN_BRANCH.to_string())
    }

    async fn show_current(&self, path: &Path) -> Option<String> {
        let result = run_git(self.executor.as_ref(), path, &["branch", "--show-current"]).await;
        result
            .succeeded()
            .then(|| result.stdout_trimmed().to_string())
    }

    /// Current, local and remote branches. Each query fails independently and
    /// leaves only its own field empty.
    pub async fn list_branches(&self, path: &Path) -> BranchSet {
        let (current, local, remote) = tokio::join!(
            self.show_current(path),
            self.names(path, &["branch", "--format=%(refname:short)"]),
            self.names(path, &["branch", "-r", "--format=%(refname:lstrip=2)"]),
        );

        BranchSet {
            current: current.unwrap_or_default(),
            local,
            remote: remote
                .into_iter()
                .filter(|name| !is_remote_head_pointer(name))
                .collect(),
        }
    }

    async fn names(&self, path: &Path, args: &[&str]) -> Vec<String> {
        let result = run_git(self.executor.as_ref(), path, args).await;
        if !result.succeeded() {
            debug!("git {:?} failed: {}", args, result.diagnostic());
            return Vec::new();
        }
        result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `git checkout <name> --`; the failure message is git's own text.
    /// The trailing `--` makes git read `name` as a revision only, never as a
    /// path to restore from HEAD.
    pub async fn checkout(&self, path: &Path, name: &str) -> OperationOutcome {
        if name.starts_with('-') {
            return OperationOutcome::failed(format!("Invalid branch name '{name}'"));
        }

        let result = run_git(self.executor.as_ref(), path, &["checkout", name, "--"]).await;

        if result.succeeded() {
            info!("Checked out '{}' in {}", name, path.display());
            OperationOutcome::succeeded(format!("Switched to branch '{name}'"))
        } else {
            warn!("Checkout of '{}' failed: {}", name, result.diagnostic());
            OperationOutcome::from_failed_command(&result)
        }
    }
}

/// `origin/HEAD` style symbolic pointer to the remote default branch
fn is_remote_head_pointer(name: &str) -> bool {
    name == "HEAD" || name.ends_with("/HEAD")
}
