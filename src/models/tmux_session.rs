// ABOUTME: Model for a tmux session as reported to the mobile client

use serde::{Deserialize, Serialize};

/// A session on the local tmux server. `name` is unique per server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmuxSession {
    /// The tmux session name
    pub name: String,
    /// Number of windows in the session
    pub windows: usize,
    /// Whether any client is currently attached to this session
    pub attached: bool,
}

impl TmuxSession {
    pub fn new(name: impl Into<String>, windows: usize, attached: bool) -> Self {
        Self {
            name: name.into(),
            windows,
            attached,
        }
    }

    /// Parse one `name:windows:attached` line from `tmux list-sessions -F`.
    ///
    /// The two numeric fields are split from the right so a name containing
    /// `:` still parses.
    pub fn parse_list_line(line: &str) -> Option<Self> {
        let mut fields = line.trim().rsplitn(3, ':');
        let attached = fields.next()?.trim().parse::<u32>().ok()?;
        let windows = fields.next()?.trim().parse::<usize>().ok()?;
        let name = fields.next()?;
        if name.is_empty() || windows == 0 {
            return None;
        }
        Some(Self::new(name, windows, attached > 0))
    }
}
