// ABOUTME: Read-only access to the scratch values written by the terminal wrapper
//
// The wrapper process records the shell's last working directory and the tty
// of the tmux client it attached. Both are best-effort: missing, unreadable or
// empty files all read as "unknown".

use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the last-known working directory file
pub const DEFAULT_CWD_FILE: &str = "/tmp/ttyd_cwd";

/// Default location of the attached client terminal device file
pub const DEFAULT_TTY_FILE: &str = "/tmp/ttyd_tty";

/// Source of the two externally-owned scratch values
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentStateProvider: Send + Sync {
    /// Directory the user's shell was last seen in
    fn last_known_path(&self) -> Option<PathBuf>;

    /// Terminal device (e.g. `/dev/pts/3`) of the tmux client acting for the
    /// remote user
    fn attached_client_device(&self) -> Option<String>;
}

/// Reads the scratch files on every call; no caching, no staleness check.
#[derive(Debug, Clone)]
pub struct ScratchFileEnvironment {
    cwd_file: PathBuf,
    tty_file: PathBuf,
}

impl ScratchFileEnvironment {
    pub fn new(cwd_file: impl Into<PathBuf>, tty_file: impl Into<PathBuf>) -> Self {
        Self {
            cwd_file: cwd_file.into(),
            tty_file: tty_file.into(),
        }
    }

    fn read_trimmed(path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let value = content.trim();
                (!value.is_empty()).then(|| value.to_string())
            }
            Err(e) => {
                debug!("Scratch file {} unavailable: {}", path.display(), e);
                None
            }
        }
    }
}

impl Default for ScratchFileEnvironment {
    fn default() -> Self {
        Self::new(DEFAULT_CWD_FILE, DEFAULT_TTY_FILE)
    }
}

impl EnvironmentStateProvider for ScratchFileEnvironment {
    fn last_known_path(&self) -> Option<PathBuf> {
        Self::read_trimmed(&self.cwd_file).map(PathBuf::from)
    }

    fn attached_client_device(&self) -> Option<String> {
        Self::read_trimmed(&self.tty_file)
    }
}

/// Fixed values for tests
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    pub last_known_path: Option<PathBuf>,
    pub attached_client_device: Option<String>,
}

impl EnvironmentStateProvider for StaticEnvironment {
    fn last_known_path(&self) -> Option<PathBuf> {
        self.last_known_path.clone()
    }

    fn attached_client_device(&self) -> Option<String> {
        self.attached_client_device.clone()
    }
}
