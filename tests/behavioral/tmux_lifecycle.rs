// ABOUTME: Behavioral tests for tmux session listing, creation, switching and cleanup
//
// All tests are conditional on tmux availability and use unique session names.

use super::fixtures::{
    cleanup_tmux_session, executor, start_tmux_session, tmux_session_exists, unique_session_name,
};
use crate::require_tmux;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use ttyd_bridge::environment::StaticEnvironment;
use ttyd_bridge::tmux::{SessionManager, NO_CLIENT_TTY};

fn manager(tty: Option<&str>) -> SessionManager {
    SessionManager::new(
        executor(),
        Arc::new(StaticEnvironment {
            last_known_path: None,
            attached_client_device: tty.map(str::to_string),
        }),
    )
}

#[tokio::test]
async fn test_list_then_kill_session() -> Result<()> {
    require_tmux!();

    let name = unique_session_name("kill");
    let dir = tempfile::tempdir()?;
    start_tmux_session(&name, dir.path())?;

    let sessions = manager(None);
    let listed = sessions.list_sessions().await;
    let entry = listed.iter().find(|s| s.name == name);
    assert!(entry.is_some(), "session {name} missing from {listed:?}");
    let entry = entry.unwrap();
    assert_eq!(entry.windows, 1);
    assert!(!entry.attached);

    assert!(sessions.kill(&name).await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!tmux_session_exists(&name));

    // Second kill has nothing to act on
    assert!(!sessions.kill(&name).await);
    Ok(())
}

#[tokio::test]
async fn test_switch_without_device() -> Result<()> {
    require_tmux!();

    let outcome = manager(None).switch("anything").await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, NO_CLIENT_TTY);
    Ok(())
}

#[tokio::test]
async fn test_switch_with_unattached_device() -> Result<()> {
    require_tmux!();

    let outcome = manager(Some("/dev/pts/9999")).switch("anything").await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Client tty /dev/pts/9999 is not attached to tmux"
    );
    Ok(())
}

/// Creation goes through even when the follow-up switch cannot
#[tokio::test]
async fn test_create_without_client_still_creates_session() -> Result<()> {
    require_tmux!();

    let name = unique_session_name("create");
    let dir = tempfile::tempdir()?;

    let outcome = manager(None).create(&name, Some(dir.path())).await;

    let exists = tmux_session_exists(&name);
    cleanup_tmux_session(&name);

    assert!(!outcome.success);
    assert_eq!(outcome.message, NO_CLIENT_TTY);
    assert!(exists, "session {name} should have been created");
    Ok(())
}

#[tokio::test]
async fn test_current_session_without_device() -> Result<()> {
    require_tmux!();

    assert_eq!(manager(None).current_session().await, None);
    Ok(())
}

/// A name that only prefixes an existing session must not touch it
#[tokio::test]
async fn test_kill_does_not_prefix_match() -> Result<()> {
    require_tmux!();

    let prefix = unique_session_name("dev");
    let longer = format!("{prefix}box");
    let dir = tempfile::tempdir()?;
    start_tmux_session(&longer, dir.path())?;

    let killed = manager(None).kill(&prefix).await;
    let survived = tmux_session_exists(&longer);
    cleanup_tmux_session(&longer);

    assert!(!killed, "kill of '{prefix}' reported success");
    assert!(survived, "session {longer} was killed by a prefix match");
    Ok(())
}
