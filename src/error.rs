// ABOUTME: Error taxonomy for request handling and the event stream

use std::path::PathBuf;
use thiserror::Error;

use crate::models::OperationOutcome;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required query parameter was absent or empty
    #[error("{message}")]
    MissingParameter { code: &'static str, message: String },

    #[error("'{}' is not a git repository", path.display())]
    NotAGitRepository { path: PathBuf },

    /// A whole-operation external call ran out of time
    #[error("Timeout")]
    ExternalCommandTimeout { code: &'static str },

    /// A whole-operation external call failed; `message` is the tool's text
    #[error("{message}")]
    ExternalCommandFailure { code: &'static str, message: String },

    /// The event-stream peer went away
    #[error("Event stream disconnected")]
    StreamDisconnected,
}

impl BridgeError {
    pub fn missing_parameter(code: &'static str, message: impl Into<String>) -> Self {
        Self::MissingParameter {
            code,
            message: message.into(),
        }
    }

    pub fn not_a_git_repository(path: impl Into<PathBuf>) -> Self {
        Self::NotAGitRepository { path: path.into() }
    }

    pub fn operation_failed(code: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalCommandFailure {
            code,
            message: message.into(),
        }
    }

    /// Map a failed outcome to the timeout or failure variant under `code`
    pub fn from_outcome(code: &'static str, outcome: OperationOutcome) -> Self {
        if outcome.timed_out {
            Self::ExternalCommandTimeout { code }
        } else {
            Self::operation_failed(code, outcome.message)
        }
    }

    /// Machine-readable code sent to the client
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter { code, .. }
            | Self::ExternalCommandTimeout { code }
            | Self::ExternalCommandFailure { code, .. } => *code,
            Self::NotAGitRepository { .. } => "not_git_repo",
            Self::StreamDisconnected => "stream_disconnected",
        }
    }
}
