// ABOUTME: Main entry point for ttyd-bridge
//
// Binary: ttyd-bridge
// Usage: ttyd-bridge [PORT] [--bind ADDR] [--config FILE] [--json-logs]

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use ttyd_bridge::cli::Cli;
use ttyd_bridge::config::BridgeConfig;
use ttyd_bridge::environment::ScratchFileEnvironment;
use ttyd_bridge::exec::TokioCommandExecutor;
use ttyd_bridge::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(args.json_logs);

    let mut config = match &args.config {
        Some(path) => {
            let mut config = BridgeConfig::load_from(path)?;
            config.apply_env_overrides(std::env::vars());
            config
        }
        None => BridgeConfig::load().context("Failed to load configuration")?,
    };
    args.apply_to(&mut config);

    check_required_tools();

    let executor = Arc::new(TokioCommandExecutor::new(config.command_timeout()));
    let environment = Arc::new(ScratchFileEnvironment::new(
        config.cwd_file.clone(),
        config.tty_file.clone(),
    ));
    let state = AppState::new(executor, environment, &config);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("ttyd-bridge listening on http://{}", addr);
    info!(
        "Scratch files: cwd={} tty={}",
        config.cwd_file.display(),
        config.tty_file.display()
    );

    axum::serve(listener, server::router(state))
        .await
        .context("HTTP server terminated")?;

    Ok(())
}

fn setup_logging(json: bool) {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ttyd_bridge=info".into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(fmt_layer.json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(filter)
            .init();
    }
}

/// Every endpoint shells out to one of these; missing ones only degrade results
fn check_required_tools() {
    for tool in ["git", "tmux"] {
        if which::which(tool).is_err() {
            warn!("'{}' not found on PATH; related endpoints will return empty results", tool);
        }
    }
}
