// ABOUTME: Configuration management for ttyd-bridge
// Handles listen address, external command timeout, stream pacing and scratch file locations

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::environment::{DEFAULT_CWD_FILE, DEFAULT_TTY_FILE};
use crate::events::DEFAULT_EVENT_INTERVAL;
use crate::exec::DEFAULT_COMMAND_TIMEOUT;
use crate::git::diff_analyzer::DEFAULT_DIFF_CONCURRENCY;

/// Prefix of environment variables that override file configuration
pub const ENV_PREFIX: &str = "TTYD_BRIDGE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port (default: 7683)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound for each git/tmux invocation in seconds (default: 10)
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Seconds between two live-state events on one connection (default: 3)
    #[serde(default = "default_event_interval_secs")]
    pub event_interval_secs: u64,

    /// File holding the last-known working directory
    #[serde(default = "default_cwd_file")]
    pub cwd_file: PathBuf,

    /// File holding the attached client's terminal device
    #[serde(default = "default_tty_file")]
    pub tty_file: PathBuf,

    /// Files enriched in parallel by the diff endpoint
    #[serde(default = "default_diff_concurrency")]
    pub diff_concurrency: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    7683
}

const fn default_command_timeout_secs() -> u64 {
    DEFAULT_COMMAND_TIMEOUT.as_secs()
}

const fn default_event_interval_secs() -> u64 {
    DEFAULT_EVENT_INTERVAL.as_secs()
}

fn default_cwd_file() -> PathBuf {
    PathBuf::from(DEFAULT_CWD_FILE)
}

fn default_tty_file() -> PathBuf {
    PathBuf::from(DEFAULT_TTY_FILE)
}

const fn default_diff_concurrency() -> usize {
    DEFAULT_DIFF_CONCURRENCY
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            command_timeout_secs: default_command_timeout_secs(),
            event_interval_secs: default_event_interval_secs(),
            cwd_file: default_cwd_file(),
            tty_file: default_tty_file(),
            diff_concurrency: default_diff_concurrency(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from default locations, then apply environment
    /// overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Lowest precedence first so more specific files win
        for path in Self::get_config_paths().iter().rev() {
            if path.exists() {
                config.merge(Self::load_from(path)?);
            }
        }

        config.apply_env_overrides(std::env::vars());
        Ok(config)
    }

    /// Parse a single config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.clamp_zero_durations();

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get configuration file paths in order of precedence
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".ttyd-bridge").join("config.toml"));
        }

        // 2. User config (~/.ttyd-bridge/config.toml)
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".ttyd-bridge").join("config.toml"));
        }

        // 3. System config
        paths.push(PathBuf::from("/etc/ttyd-bridge/config.toml"));

        paths
    }

    /// Merge another config into this one; fields left at their default in
    /// `other` do not override
    pub fn merge(&mut self, other: Self) {
        if other.bind_address != default_bind_address() {
            self.bind_address = other.bind_address;
        }
        if other.port != default_port() {
            self.port = other.port;
        }
        if other.command_timeout_secs != default_command_timeout_secs() {
            self.command_timeout_secs = other.command_timeout_secs;
        }
        if other.event_interval_secs != default_event_interval_secs() {
            self.event_interval_secs = other.event_interval_secs;
        }
        if other.cwd_file != default_cwd_file() {
            self.cwd_file = other.cwd_file;
        }
        if other.tty_file != default_tty_file() {
            self.tty_file = other.tty_file;
        }
        if other.diff_concurrency != default_diff_concurrency() {
            self.diff_concurrency = other.diff_concurrency;
        }
    }

    /// Apply `TTYD_BRIDGE_*` overrides. Unparsable values are ignored with a
    /// warning.
    pub fn apply_env_overrides(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match field {
                "BIND_ADDRESS" => self.bind_address = value,
                "PORT" => set_parsed(&mut self.port, &key, &value),
                "COMMAND_TIMEOUT_SECS" => set_parsed(&mut self.command_timeout_secs, &key, &value),
                "EVENT_INTERVAL_SECS" => set_parsed(&mut self.event_interval_secs, &key, &value),
                "CWD_FILE" => self.cwd_file = PathBuf::from(value),
                "TTY_FILE" => self.tty_file = PathBuf::from(value),
                "DIFF_CONCURRENCY" => set_parsed(&mut self.diff_concurrency, &key, &value),
                _ => debug!("Ignoring unknown config variable {}", key),
            }
        }
        self.clamp_zero_durations();
    }

    /// A zero timeout fails every command and a zero interval spins the event
    /// loop; both are raised to one second
    fn clamp_zero_durations(&mut self) {
        if self.command_timeout_secs == 0 {
            warn!("command_timeout_secs = 0 is not allowed, using 1");
            self.command_timeout_secs = 1;
        }
        if self.event_interval_secs == 0 {
            warn!("event_interval_secs = 0 is not allowed, using 1");
            self.event_interval_secs = 1;
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }

    pub fn event_interval(&self) -> Duration {
        Duration::from_secs(self.event_interval_secs.max(1))
    }

    /// Listen address; `bind_address` is a bare IPv4 or IPv6 address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_address))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn set_parsed<T: std::str::FromStr>(target: &mut T, key: &str, value: &str) {
    match value.trim().parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!("Ignoring {}={:?}: not a valid value", key, value),
    }
}
