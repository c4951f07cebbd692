// ABOUTME: Value types exchanged with the mobile client: diffs, branches, sessions, live state

pub mod branch;
pub mod diff;
pub mod live_state;
pub mod outcome;
pub mod tmux_session;

pub use branch::BranchSet;
pub use diff::{DiffReport, DiffSummary, FileDiffEntry, FileStatus};
pub use live_state::{LiveStatePayload, TmuxState};
pub use outcome::OperationOutcome;
pub use tmux_session::TmuxSession;
