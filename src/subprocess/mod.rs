//! Subprocess execution layer
//!
//! Everything that spawns an external program goes through [`ProcessRunner`],
//! so tests can swap in [`MockProcessRunner`] without touching callers.

pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;

#[cfg(test)]
mod tests;

pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};

use std::sync::Arc;
use std::time::Duration;

use crate::git::GitCommandRunner;

#[derive(Clone)]
pub struct SubprocessManager {
    runner: Arc<dyn ProcessRunner>,
}

impl SubprocessManager {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    pub fn production() -> Self {
        Self::new(Arc::new(TokioProcessRunner))
    }

    #[cfg(test)]
    pub fn mock() -> (Self, MockProcessRunner) {
        let mock = MockProcessRunner::new();
        let runner = Arc::new(mock.clone()) as Arc<dyn ProcessRunner>;
        (Self::new(runner), mock)
    }

    pub fn runner(&self) -> Arc<dyn ProcessRunner> {
        Arc::clone(&self.runner)
    }

    /// Git command runner rooted at `repo`, with an optional per-command timeout.
    pub fn git(&self, repo: impl Into<std::path::PathBuf>, timeout: Option<Duration>) -> GitCommandRunner {
        GitCommandRunner::new(Arc::clone(&self.runner), repo.into()).with_timeout(timeout)
    }
}
