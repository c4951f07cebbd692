// ABOUTME: Shared test fixtures and utilities for behavioral tests
//
// Provides:
// - TestRepo: Temporary git repository for testing
// - executor(): Real command executor with the default timeout
// - tmux_available(): Check if tmux is installed
// - require_tmux!(): Skip test if tmux unavailable

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use ttyd_bridge::exec::{CommandExecutor, TokioCommandExecutor};
use uuid::Uuid;

/// Creates a temporary git repository with initial commit
pub struct TestRepo {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Create a new temporary git repository with initial commit
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().to_path_buf();
        let repo = Self { dir, path };

        repo.git(&["init"])?;
        repo.git(&["config", "user.email", "test@test.com"])?;
        repo.git(&["config", "user.name", "Test User"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;

        repo.add_commit("README.md", "# Test Repo\n", "Initial commit")?;
        Ok(repo)
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run git in the repository, failing on non-zero exit
    pub fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()?;
        if !output.status.success() {
            anyhow::bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(String::from_utf8(output.stdout)?)
    }

    /// Write a file in the working tree without staging it
    pub fn write(&self, filename: &str, content: impl AsRef<[u8]>) -> Result<()> {
        std::fs::write(self.path.join(filename), content)?;
        Ok(())
    }

    /// Add a file and commit it
    pub fn add_commit(&self, filename: &str, content: &str, message: &str) -> Result<()> {
        self.write(filename, content)?;
        self.git(&["add", filename])?;
        self.git(&["commit", "-m", message])?;
        Ok(())
    }

    /// Get current branch name
    pub fn current_branch(&self) -> Result<String> {
        Ok(self.git(&["branch", "--show-current"])?.trim().to_string())
    }

    /// Toplevel as git reports it (symlinks resolved)
    pub fn toplevel(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(self.git(&["rev-parse", "--show-toplevel"])?.trim()))
    }
}

/// Executor that really spawns processes
pub fn executor() -> Arc<dyn CommandExecutor> {
    Arc::new(TokioCommandExecutor::default())
}

/// Check if tmux is available on the system
pub fn tmux_available() -> bool {
    Command::new("tmux")
        .args(["-V"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Macro to skip test if tmux is not available
#[macro_export]
macro_rules! require_tmux {
    () => {
        if !super::fixtures::tmux_available() {
            eprintln!("Skipping test: tmux not available");
            return Ok(());
        }
    };
}

/// Generate a unique test session name to avoid conflicts
pub fn unique_session_name(prefix: &str) -> String {
    format!("test_{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

/// Helper to clean up a tmux session by name
pub fn cleanup_tmux_session(name: &str) {
    let _ = Command::new("tmux")
        .args(["kill-session", "-t", &format!("={name}")])
        .output();
}

/// Check if a tmux session with exactly this name exists
pub fn tmux_session_exists(name: &str) -> bool {
    Command::new("tmux")
        .args(["has-session", "-t", &format!("={name}")])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Start a detached session directly through tmux
pub fn start_tmux_session(name: &str, dir: &Path) -> Result<()> {
    let output = Command::new("tmux")
        .args(["new-session", "-d", "-s", name, "-c"])
        .arg(dir)
        .output()?;
    if !output.status.success() {
        anyhow::bail!(
            "tmux new-session failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_creation() -> Result<()> {
        let repo = TestRepo::new()?;
        assert!(repo.path().exists());
        assert!(repo.path().join(".git").exists());
        assert!(repo.path().join("README.md").exists());
        Ok(())
    }

    #[test]
    fn test_repo_add_commit() -> Result<()> {
        let repo = TestRepo::new()?;
        repo.add_commit("test.txt", "hello", "Add test file")?;
        assert!(repo.path().join("test.txt").exists());
        assert!(repo.git(&["status", "--porcelain"])?.is_empty());
        Ok(())
    }
}
