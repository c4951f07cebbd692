// ABOUTME: CLI argument parsing for ttyd-bridge
//
// Usage: ttyd-bridge [PORT] [--bind ADDR] [--config FILE] [--json-logs]

use clap::Parser;
use std::path::PathBuf;

use crate::config::BridgeConfig;

/// HTTP/SSE bridge exposing tmux sessions and git state to a mobile terminal client
#[derive(Parser, Debug)]
#[command(name = "ttyd-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on (overrides config)
    pub port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    pub bind: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Flags win over every other configuration source
    pub fn apply_to(&self, config: &mut BridgeConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = &self.bind {
            config.bind_address.clone_from(bind);
        }
    }
}
