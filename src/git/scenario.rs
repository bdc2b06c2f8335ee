//! Scenario-based command runner for testing workflows without a repository

use super::{CommandResult, CommandRunner};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Canned outcome for a matched command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ScenarioResponse {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn fail(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

type TokenMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

struct ScenarioRule {
    matcher: TokenMatcher,
    response: ScenarioResponse,
    remaining: Option<usize>,
}

/// Replays responses for git commands and records every call.
///
/// Rules are tried in registration order; the first matching rule with uses
/// left answers. Commands no rule matches succeed with empty output.
#[derive(Clone, Default)]
pub struct ScenarioRunner {
    rules: Arc<Mutex<Vec<ScenarioRule>>>,
    command_log: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to every call of a git subcommand (`commit`, `push`, ...)
    pub async fn when_command(&self, subcommand: &str, response: ScenarioResponse) {
        let subcommand = subcommand.to_string();
        self.when(
            move |tokens| tokens.get(1) == Some(&subcommand),
            response,
            None,
        )
        .await;
    }

    /// Respond to the next call of a git subcommand only
    pub async fn when_command_once(&self, subcommand: &str, response: ScenarioResponse) {
        let subcommand = subcommand.to_string();
        self.when(
            move |tokens| tokens.get(1) == Some(&subcommand),
            response,
            Some(1),
        )
        .await;
    }

    /// Respond to any command matching `matcher`
    pub async fn when<F>(&self, matcher: F, response: ScenarioResponse, times: Option<usize>)
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.rules.lock().await.push(ScenarioRule {
            matcher: Box::new(matcher),
            response,
            remaining: times,
        });
    }

    /// Every command run so far, in order
    pub async fn get_command_log(&self) -> Vec<Vec<String>> {
        self.command_log.lock().await.clone()
    }

    /// Git subcommands run so far, in order
    pub async fn subcommands(&self) -> Vec<String> {
        self.command_log
            .lock()
            .await
            .iter()
            .filter_map(|tokens| tokens.get(1).cloned())
            .collect()
    }

    /// Number of calls of one git subcommand
    pub async fn count(&self, subcommand: &str) -> usize {
        self.command_log
            .lock()
            .await
            .iter()
            .filter(|tokens| tokens.get(1).map(String::as_str) == Some(subcommand))
            .count()
    }

    pub async fn clear_command_log(&self) {
        self.command_log.lock().await.clear();
    }
}

#[async_trait]
impl CommandRunner for ScenarioRunner {
    async fn run(&self, tokens: &[String]) -> CommandResult {
        self.command_log.lock().await.push(tokens.to_vec());

        let mut rules = self.rules.lock().await;
        let response = rules
            .iter_mut()
            .find(|rule| rule.remaining != Some(0) && (rule.matcher)(tokens))
            .map(|rule| {
                if let Some(remaining) = rule.remaining.as_mut() {
                    *remaining -= 1;
                }
                rule.response.clone()
            })
            .unwrap_or_default();

        CommandResult {
            command: tokens.to_vec(),
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            duration: Duration::ZERO,
        }
    }
}
