//! Boundary to the version-control engine
//!
//! [`CommandRunner`] is the single seam between workflow logic and git. The
//! production [`GitCommandRunner`] spawns real processes; [`ScenarioRunner`]
//! replays canned results for tests.

pub mod commands;
pub mod parsers;
pub mod scenario;
pub mod types;

pub use parsers::*;
pub use scenario::{ScenarioResponse, ScenarioRunner};
pub use types::*;

use crate::subprocess::{ProcessCommandBuilder, ProcessRunner};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Executes one engine command and reports what happened.
///
/// Implementations never fail: a non-zero exit, a missing binary or a
/// timeout all come back as a [`CommandResult`] with a non-zero `exit_code`.
/// Commands against one working copy must not run concurrently; callers
/// serialize.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, tokens: &[String]) -> CommandResult;
}

/// Runs commands as child processes inside one repository directory
pub struct GitCommandRunner {
    process_runner: Arc<dyn ProcessRunner>,
    repo: PathBuf,
    timeout: Option<Duration>,
}

impl GitCommandRunner {
    pub fn new(process_runner: Arc<dyn ProcessRunner>, repo: PathBuf) -> Self {
        Self {
            process_runner,
            repo,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CommandRunner for GitCommandRunner {
    async fn run(&self, tokens: &[String]) -> CommandResult {
        let start = Instant::now();
        let Some((program, args)) = tokens.split_first() else {
            return CommandResult {
                command: Vec::new(),
                exit_code: -1,
                stdout: String::new(),
                stderr: "empty command".to_string(),
                duration: start.elapsed(),
            };
        };

        // Engine messages are matched textually (conflict detection), so pin
        // them to the untranslated locale.
        let command = ProcessCommandBuilder::new(program)
            .args(args)
            .env("LC_ALL", "C")
            .current_dir(&self.repo)
            .maybe_timeout(self.timeout)
            .build();

        match self.process_runner.run(command).await {
            Ok(output) => CommandResult {
                command: tokens.to_vec(),
                exit_code: output.status.as_shell_code(),
                stdout: output.stdout,
                stderr: output.stderr,
                duration: output.duration,
            },
            Err(error) => {
                tracing::warn!("Could not run '{}': {}", shell_words::join(tokens), error);
                CommandResult {
                    command: tokens.to_vec(),
                    exit_code: error.synthetic_exit_code(),
                    stdout: String::new(),
                    stderr: error.to_string(),
                    duration: start.elapsed(),
                }
            }
        }
    }
}
