// ABOUTME: Behavioral tests driving the HTTP router against a real repository
//
// The router is exercised in-process with tower's oneshot; the resolved
// directory comes from a fixed environment pointing at a temporary repo.

use super::fixtures::{executor, TestRepo};
use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use ttyd_bridge::config::BridgeConfig;
use ttyd_bridge::environment::StaticEnvironment;
use ttyd_bridge::server::{router, AppState};

fn app_at(dir: &Path) -> Router {
    let environment = Arc::new(StaticEnvironment {
        last_known_path: Some(dir.to_path_buf()),
        attached_client_device: None,
    });
    router(AppState::new(executor(), environment, &BridgeConfig::default()))
}

async fn get(app: Router, uri: &str) -> Result<(StatusCode, Value)> {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_diff_endpoint_reports_new_file() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.write("a.txt", "hi")?;
    let branch = repo.current_branch()?;

    let (status, body) = get(app_at(repo.path()), "/api/diff").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cwd"], repo.path().display().to_string());
    assert_eq!(body["git_root"], repo.toplevel()?.display().to_string());
    assert_eq!(body["branch"], branch);
    assert_eq!(
        body["files"],
        json!([{
            "filename": "a.txt",
            "status": "A",
            "binary": false,
            "oldValue": "",
            "newValue": "hi",
            "additions": 1,
            "deletions": 0,
        }])
    );
    assert_eq!(
        body["summary"],
        json!({"totalFiles": 1, "totalAdditions": 1, "totalDeletions": 0})
    );
    Ok(())
}

#[tokio::test]
async fn test_diff_endpoint_outside_repository() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let (status, body) = get(app_at(dir.path()), "/api/diff").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "not_git_repo");
    assert_eq!(body["cwd"], dir.path().display().to_string());
    Ok(())
}

#[tokio::test]
async fn test_cwd_endpoint() -> Result<()> {
    let repo = TestRepo::new()?;
    let plain = tempfile::tempdir()?;

    let (_, body) = get(app_at(repo.path()), "/api/cwd").await?;
    assert_eq!(
        body,
        json!({"cwd": repo.path().display().to_string(), "is_git": true})
    );

    let (_, body) = get(app_at(plain.path()), "/api/cwd").await?;
    assert_eq!(body["is_git"], false);
    Ok(())
}

#[tokio::test]
async fn test_branches_and_checkout_endpoints() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.git(&["branch", "feature"])?;
    let initial = repo.current_branch()?;
    let app = app_at(repo.path());

    let (status, body) = get(app.clone(), "/api/git/branches").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current"], initial);
    assert_eq!(body["remote"], json!([]));

    let (status, body) = get(app.clone(), "/api/git/checkout?branch=feature").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "branch": "feature"}));
    assert_eq!(repo.current_branch()?, "feature");

    let (status, body) = get(app, "/api/git/checkout?branch=nowhere").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "checkout_failed");
    assert!(body["message"].as_str().unwrap_or_default().contains("nowhere"));
    Ok(())
}

#[tokio::test]
async fn test_branches_outside_repository() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let (status, body) = get(app_at(dir.path()), "/api/git/branches").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_git_repo");
    Ok(())
}

#[tokio::test]
async fn test_health_and_unknown_route() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let (status, body) = get(app_at(dir.path()), "/api/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = get(app_at(dir.path()), "/favicon.ico").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not_found"}));
    Ok(())
}
