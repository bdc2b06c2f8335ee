use std::time::Duration;

/// Failures to run a process at all. A process that ran and exited non-zero
/// is not an error at this layer; see [`super::ExitStatus`].
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Process timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mock expectation not met: {0}")]
    MockExpectationNotMet(String),
}

impl ProcessError {
    /// Exit code reported to callers that need a numeric status for a process
    /// that never produced one. Follows shell conventions.
    pub fn synthetic_exit_code(&self) -> i32 {
        match self {
            ProcessError::CommandNotFound(_) => 127,
            ProcessError::Timeout(_) => 124,
            ProcessError::SpawnFailed { .. } => 126,
            ProcessError::Io(_) | ProcessError::MockExpectationNotMet(_) => -1,
        }
    }
}
