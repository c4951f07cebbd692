// ABOUTME: Success flag plus message for mutating operations (checkout, create, switch)

use crate::exec::CommandResult;

/// Result of an operation whose failure text is shown to the user as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
    /// The external call ran out of time
    pub timed_out: bool,
}

impl OperationOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            success: false,
            message: "Timeout".to_string(),
            timed_out: true,
        }
    }

    /// Failure outcome for an external call: "Timeout" or the tool's own text
    pub fn from_failed_command(result: &CommandResult) -> Self {
        if result.timed_out {
            Self::timed_out()
        } else {
            Self::failed(result.diagnostic())
        }
    }
}
