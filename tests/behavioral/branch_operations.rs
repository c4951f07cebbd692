// ABOUTME: Behavioral tests for branch listing, checkout and repository detection

use super::fixtures::{executor, TestRepo};
use anyhow::Result;
use std::process::Command;
use ttyd_bridge::git::{BranchManager, RepositoryProbe, UNKNOWN_BRANCH};

#[tokio::test]
async fn test_detects_repository_and_root() -> Result<()> {
    let repo = TestRepo::new()?;
    std::fs::create_dir(repo.path().join("src"))?;
    let probe = RepositoryProbe::new(executor());

    assert!(probe.is_git_repo(&repo.path().join("src")).await);
    assert_eq!(probe.git_root(&repo.path().join("src")).await, repo.toplevel()?);
    Ok(())
}

#[tokio::test]
async fn test_outside_repository_falls_back_to_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let probe = RepositoryProbe::new(executor());

    assert!(!probe.is_git_repo(dir.path()).await);
    assert_eq!(probe.git_root(dir.path()).await, dir.path());
    Ok(())
}

#[tokio::test]
async fn test_current_branch_outside_repository_is_unknown() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let branches = BranchManager::new(executor());

    assert_eq!(branches.current_branch(dir.path()).await, UNKNOWN_BRANCH);
    Ok(())
}

#[tokio::test]
async fn test_list_branches_local_only() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.git(&["branch", "feature"])?;
    let initial = repo.current_branch()?;

    let set = BranchManager::new(executor()).list_branches(repo.path()).await;

    assert_eq!(set.current, initial);
    assert!(set.local.contains(&initial));
    assert!(set.local.contains(&"feature".to_string()));
    assert!(set.remote.is_empty());
    Ok(())
}

/// A clone has `origin/HEAD`; it must not appear among remote branches
#[tokio::test]
async fn test_list_branches_skips_remote_head() -> Result<()> {
    let upstream = TestRepo::new()?;
    let initial = upstream.current_branch()?;
    let clone_dir = tempfile::tempdir()?;
    let clone_path = clone_dir.path().join("clone");

    let status = Command::new("git")
        .arg("clone")
        .arg(upstream.path())
        .arg(&clone_path)
        .output()?;
    assert!(status.status.success());

    let set = BranchManager::new(executor()).list_branches(&clone_path).await;

    assert_eq!(set.remote, vec![format!("origin/{initial}")]);
    assert!(set.remote.iter().all(|name| !name.ends_with("/HEAD")));
    Ok(())
}

#[tokio::test]
async fn test_checkout_existing_branch() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.git(&["branch", "feature"])?;
    let branches = BranchManager::new(executor());

    let outcome = branches.checkout(repo.path(), "feature").await;

    assert!(outcome.success, "checkout failed: {}", outcome.message);
    assert_eq!(repo.current_branch()?, "feature");
    assert_eq!(branches.current_branch(repo.path()).await, "feature");
    Ok(())
}

/// git's own error text is passed through
#[tokio::test]
async fn test_checkout_missing_branch_reports_git_error() -> Result<()> {
    let repo = TestRepo::new()?;
    let before = repo.current_branch()?;

    let outcome = BranchManager::new(executor())
        .checkout(repo.path(), "does-not-exist")
        .await;

    assert!(!outcome.success);
    assert!(!outcome.timed_out);
    assert!(outcome.message.contains("does-not-exist"), "{}", outcome.message);
    assert_eq!(repo.current_branch()?, before);
    Ok(())
}

/// A file name is never taken for a branch; uncommitted edits stay put
#[tokio::test]
async fn test_checkout_with_file_name_keeps_uncommitted_edit() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_commit("notes.txt", "committed\n", "Add notes")?;
    repo.write("notes.txt", "UNSAVED WORK\n")?;
    let before = repo.current_branch()?;

    let outcome = BranchManager::new(executor())
        .checkout(repo.path(), "notes.txt")
        .await;

    assert!(!outcome.success, "checkout reported success: {}", outcome.message);
    assert_eq!(
        std::fs::read_to_string(repo.path().join("notes.txt"))?,
        "UNSAVED WORK\n"
    );
    assert_eq!(repo.current_branch()?, before);
    Ok(())
}
