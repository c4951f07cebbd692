// ABOUTME: HTTP surface - axum router over the cwd, diff, tmux, branch and event components

pub mod error;
pub mod handlers;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::config::BridgeConfig;
use crate::cwd::CwdResolver;
use crate::environment::EnvironmentStateProvider;
use crate::events::{LiveStateSampler, StateSource};
use crate::exec::CommandExecutor;
use crate::git::{BranchManager, DiffAggregator, RepositoryProbe};
use crate::tmux::SessionManager;

/// Components shared by every request. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub cwd: Arc<CwdResolver>,
    pub probe: RepositoryProbe,
    pub branches: BranchManager,
    pub diff: DiffAggregator,
    pub sessions: SessionManager,
    pub live_state: Arc<dyn StateSource>,
    pub event_interval: Duration,
}

impl AppState {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        environment: Arc<dyn EnvironmentStateProvider>,
        config: &BridgeConfig,
    ) -> Self {
        let cwd = Arc::new(CwdResolver::standard(
            Arc::clone(&executor),
            Arc::clone(&environment),
        ));
        let probe = RepositoryProbe::new(Arc::clone(&executor));
        let branches = BranchManager::new(Arc::clone(&executor));
        let sessions = SessionManager::new(Arc::clone(&executor), environment);
        let diff = DiffAggregator::with_concurrency(executor, config.diff_concurrency);

        let live_state = Arc::new(LiveStateSampler::new(
            Arc::clone(&cwd),
            probe.clone(),
            branches.clone(),
            sessions.clone(),
        ));

        Self {
            cwd,
            probe,
            branches,
            diff,
            sessions,
            live_state,
            event_interval: config.event_interval(),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/cwd", get(handlers::cwd))
        .route("/api/diff", get(handlers::diff))
        .route("/api/health", get(handlers::health))
        .route("/api/tmux/list", get(handlers::tmux_list))
        .route("/api/tmux/kill", get(handlers::tmux_kill))
        .route("/api/tmux/switch", get(handlers::tmux_switch))
        .route("/api/tmux/create", get(handlers::tmux_create))
        .route("/api/git/branches", get(handlers::git_branches))
        .route("/api/git/checkout", get(handlers::git_checkout))
        .route("/api/events", get(handlers::events))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
