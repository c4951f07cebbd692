// ABOUTME: Request handlers - one thin adapter per endpoint over the core components

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use tokio_stream::StreamExt;
use tracing::debug;

use super::AppState;
use crate::error::BridgeError;
use crate::events::LiveStateBroadcaster;
use crate::models::{BranchSet, DiffReport, TmuxState};

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BranchQuery {
    pub branch: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CwdResponse {
    pub cwd: String,
    pub is_git: bool,
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub cwd: String,
    pub git_root: String,
    pub branch: String,
    #[serde(flatten)]
    pub report: DiffReport,
}

/// Absent and empty parameters are treated alike
fn required(
    value: Option<String>,
    code: &'static str,
    message: &str,
) -> Result<String, BridgeError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BridgeError::missing_parameter(code, message))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub async fn cwd(State(state): State<AppState>) -> Json<CwdResponse> {
    let cwd = state.cwd.resolve().await;
    let is_git = state.probe.is_git_repo(&cwd).await;
    Json(CwdResponse {
        cwd: cwd.display().to_string(),
        is_git,
    })
}

/// Working-tree diff of the repository containing the resolved directory.
/// Outside a repository this answers 200 with an error body.
pub async fn diff(State(state): State<AppState>) -> Response {
    let cwd = state.cwd.resolve().await;
    let cwd_text = cwd.display().to_string();

    if !state.probe.is_git_repo(&cwd).await {
        let err = BridgeError::not_a_git_repository(&cwd);
        return Json(json!({
            "error": err.code(),
            "message": err.to_string(),
            "cwd": cwd_text,
        }))
        .into_response();
    }

    let root = state.probe.git_root(&cwd).await;
    let (report, branch) = tokio::join!(
        state.diff.diff(&root),
        state.branches.current_branch(&root)
    );

    Json(DiffResponse {
        cwd: cwd_text,
        git_root: root.display().to_string(),
        branch,
        report,
    })
    .into_response()
}

pub async fn tmux_list(State(state): State<AppState>) -> Json<TmuxState> {
    let (sessions, current_session) = tokio::join!(
        state.sessions.list_sessions(),
        state.sessions.current_session()
    );
    Json(TmuxState {
        sessions,
        current_session,
    })
}

pub async fn tmux_kill(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<serde_json::Value>, BridgeError> {
    let name = required(query.name, "missing_name", "Session name required")?;

    if state.sessions.kill(&name).await {
        Ok(Json(json!({
            "success": true,
            "message": format!("Session '{name}' killed"),
        })))
    } else {
        Err(BridgeError::operation_failed(
            "kill_failed",
            format!("Failed to kill session '{name}'"),
        ))
    }
}

pub async fn tmux_switch(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<serde_json::Value>, BridgeError> {
    let session = required(query.session, "missing_session", "Session name required")?;

    let outcome = state.sessions.switch(&session).await;
    if outcome.success {
        Ok(Json(json!({"success": true})))
    } else {
        Err(BridgeError::from_outcome("switch_failed", outcome))
    }
}

pub async fn tmux_create(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<serde_json::Value>, BridgeError> {
    let name = required(query.name, "missing_name", "Session name required")?;

    let start_dir = state.cwd.resolve().await;
    let outcome = state.sessions.create(&name, Some(&start_dir)).await;
    if outcome.success {
        Ok(Json(json!({
            "success": true,
            "message": outcome.message,
        })))
    } else {
        Err(BridgeError::from_outcome("create_failed", outcome))
    }
}

pub async fn git_branches(State(state): State<AppState>) -> Result<Json<BranchSet>, BridgeError> {
    let cwd = state.cwd.resolve().await;
    if !state.probe.is_git_repo(&cwd).await {
        return Err(BridgeError::not_a_git_repository(cwd));
    }

    let root = state.probe.git_root(&cwd).await;
    Ok(Json(state.branches.list_branches(&root).await))
}

pub async fn git_checkout(
    State(state): State<AppState>,
    Query(query): Query<BranchQuery>,
) -> Result<Json<serde_json::Value>, BridgeError> {
    let branch = required(query.branch, "missing_branch", "Branch name required")?;

    let cwd = state.cwd.resolve().await;
    if !state.probe.is_git_repo(&cwd).await {
        return Err(BridgeError::not_a_git_repository(cwd));
    }

    let root = state.probe.git_root(&cwd).await;
    let outcome = state.branches.checkout(&root, &branch).await;
    if outcome.success {
        Ok(Json(json!({"success": true, "branch": branch})))
    } else {
        Err(BridgeError::from_outcome("checkout_failed", outcome))
    }
}

/// One broadcaster per connection; each payload becomes a single `data:` event
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream opened");
    let payloads =
        LiveStateBroadcaster::new(state.live_state, state.event_interval).spawn();
    Sse::new(payloads.map(|json| Ok::<_, Infallible>(Event::default().data(json))))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    debug!("No route for {}", uri.path());
    (StatusCode::NOT_FOUND, Json(json!({"error": "not_found"})))
}
