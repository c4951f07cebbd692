// ABOUTME: Tmux integration for the mobile bridge
//
// This module covers everything the bridge asks of the local tmux server:
// - Enumerating sessions with window counts and attach state
// - Resolving the remote user's client tty to a session and pane directory
// - Creating, switching and killing sessions on behalf of that client

pub mod client;
pub mod session;

pub use client::TmuxClientQuery;
pub use session::{SessionManager, NO_CLIENT_TTY};
