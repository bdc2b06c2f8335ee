//! Sequencing of git commands for each workflow action
//!
//! Every step that changes the repository runs through
//! [`Invocation::mutate`], which renders the graph right after the command
//! whether it succeeded or not. Handlers have no other way to run a mutating
//! command, so a new action cannot skip the render.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::action::WorkflowAction;
use super::report::WorkflowReport;
use super::step::{Step, StepRecord, StepStatus};
use crate::convention::{self, CommitMessage, ValidationError};
use crate::error::{CommandFailure, WorkflowError};
use crate::git::{commands, parsers, BranchListing, CommandResult, CommandRunner, GraphScope};
use crate::graph::{self, GraphSnapshot, RenderOptions};

/// Knobs that shape how actions run, resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub remote: String,
    /// Commits per rendered graph; non-positive means no limit
    pub graph_lines: i64,
    pub subject_max_len: usize,
    pub render: RenderOptions,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            graph_lines: 20,
            subject_max_len: convention::DEFAULT_SUBJECT_MAX_LEN,
            render: RenderOptions::default(),
        }
    }
}

/// Turns a [`WorkflowAction`] into an ordered run of git commands.
///
/// Holds no repository state between calls; whatever it needs to know
/// (current branch, existing branches, upstream) is asked of git each time.
/// One invocation at a time per working copy.
pub struct WorkflowOrchestrator {
    runner: Arc<dyn CommandRunner>,
    settings: WorkflowSettings,
}

impl WorkflowOrchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            settings: WorkflowSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Run one action to completion or to its first failure.
    pub async fn execute(&self, action: WorkflowAction) -> WorkflowReport {
        let name = action.name();
        info!("Starting workflow '{}'", name);

        let mut run = Invocation::new(self, name);
        let outcome = match action {
            WorkflowAction::QuickCommitAndPush { message } => {
                run.quick_commit_and_push(&message).await
            }
            WorkflowAction::CreateBranchAndSwitch { branch } => {
                run.create_branch_and_switch(&branch).await
            }
            WorkflowAction::CommitToNewBranch { branch, message } => {
                run.commit_to_new_branch(&branch, &message).await
            }
            WorkflowAction::MergeBranch { branch } => run.merge_branch(&branch).await,
            WorkflowAction::Fetch => run.fetch().await,
            WorkflowAction::SwitchBranch { branch } => run.switch_branch(&branch).await,
            WorkflowAction::Pull => run.pull().await,
            WorkflowAction::DeleteBranch { branch, remote } => {
                run.delete_branch(&branch, remote).await
            }
            WorkflowAction::SetupRemote { url } => run.setup_remote(&url).await,
            WorkflowAction::ShowGraph { scope } => run.render("current state", scope).await,
        };

        run.finish(outcome)
    }

    /// Local and remote branches, current one marked. Read-only.
    pub async fn branches(&self) -> Result<BranchListing, WorkflowError> {
        Invocation::new(self, "branches").branch_listing().await
    }
}

/// State of a single `execute` call
struct Invocation<'a> {
    runner: &'a dyn CommandRunner,
    settings: &'a WorkflowSettings,
    report: WorkflowReport,
}

impl<'a> Invocation<'a> {
    fn new(orchestrator: &'a WorkflowOrchestrator, action: &'static str) -> Self {
        Self {
            runner: orchestrator.runner.as_ref(),
            settings: &orchestrator.settings,
            report: WorkflowReport::new(action),
        }
    }

    fn finish(mut self, outcome: Result<(), WorkflowError>) -> WorkflowReport {
        match outcome {
            Ok(()) => info!("Workflow '{}' completed", self.report.action),
            Err(error) => {
                info!("Workflow '{}' stopped: {}", self.report.action, error);
                self.report.error = Some(error);
            }
        }
        self.report
    }

    // --- primitives -------------------------------------------------------

    /// Run a command and record it. `probe` commands answer a question with
    /// their exit code, so a non-zero exit is recorded as a success.
    async fn run(&mut self, step: Step, tokens: Vec<String>, probe: bool) -> CommandResult {
        debug!("{}: {}", step, shell_words::join(&tokens));
        let result = self.runner.run(&tokens).await;

        self.report.steps.push(StepRecord {
            step,
            command: Some(result.command_line()),
            exit_code: Some(result.exit_code),
            status: if result.success() || probe {
                StepStatus::Succeeded
            } else {
                StepStatus::Failed
            },
            duration: result.duration,
        });
        result
    }

    /// Run a read-only command that must succeed
    async fn exec(&mut self, step: Step, tokens: Vec<String>) -> Result<CommandResult, WorkflowError> {
        debug_assert!(!step.is_mutating(), "{step} must go through mutate");
        let result = self.run(step, tokens, false).await;
        ensure_success(step, &result)?;
        Ok(result)
    }

    /// Run a read-only command whose exit code is the answer
    async fn probe(&mut self, step: Step, tokens: Vec<String>) -> CommandResult {
        debug_assert!(!step.is_mutating(), "{step} must go through mutate");
        self.run(step, tokens, true).await
    }

    /// Run a state-changing command, then render the graph unconditionally.
    ///
    /// Returns the command's result for the caller to judge. Errs only when
    /// the command succeeded but the follow-up render did not; a render
    /// failure after a failed command is logged and the command's own
    /// failure takes precedence.
    async fn mutate(
        &mut self,
        step: Step,
        tokens: Vec<String>,
        scope: GraphScope,
    ) -> Result<CommandResult, WorkflowError> {
        info!("Running step '{}'", step);
        let result = self.run(step, tokens, false).await;

        if result.success() {
            self.render(format!("after {step}"), scope).await?;
        } else if let Err(render_error) = self.render(format!("after failed {step}"), scope).await {
            warn!(
                "Could not render graph after failed step '{}': {}",
                step, render_error
            );
        }

        Ok(result)
    }

    /// Record a pure check
    fn check<T>(&mut self, step: Step, outcome: Result<T, ValidationError>) -> Result<T, WorkflowError> {
        self.report.steps.push(StepRecord {
            step,
            command: None,
            exit_code: None,
            status: if outcome.is_ok() {
                StepStatus::Succeeded
            } else {
                StepStatus::Failed
            },
            duration: std::time::Duration::ZERO,
        });
        outcome.map_err(WorkflowError::from)
    }

    async fn render(&mut self, label: impl Into<String>, scope: GraphScope) -> Result<(), WorkflowError> {
        let lines = self.settings.graph_lines;
        let result = self
            .run(Step::Graph, commands::log_graph(lines, scope), false)
            .await;

        let entries = if result.success() {
            parsers::parse_log_graph(&result.stdout)
        } else if is_unborn_history(&result) {
            Vec::new()
        } else {
            return Err(CommandFailure::from_result(Step::Graph, &result).into());
        };

        let text = graph::render_with(&entries, lines, &self.settings.render);
        self.report.snapshots.push(GraphSnapshot {
            label: label.into(),
            scope,
            entries,
            text,
        });
        Ok(())
    }

    // --- queries ----------------------------------------------------------

    async fn current_branch(&mut self) -> Result<Option<String>, WorkflowError> {
        let result = self
            .exec(Step::CurrentBranch, commands::current_branch())
            .await?;
        let name = result.stdout.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    async fn local_branch_exists(&mut self, branch: &str) -> Result<bool, WorkflowError> {
        let result = self
            .exec(Step::CheckBranch, commands::find_local_branch(branch))
            .await?;
        Ok(!result.stdout.trim().is_empty())
    }

    async fn branch_listing(&mut self) -> Result<BranchListing, WorkflowError> {
        let current = self.current_branch().await?;
        let local = self
            .exec(Step::ListBranches, commands::local_branches())
            .await?;
        let remote = self
            .exec(Step::ListBranches, commands::remote_branches())
            .await?;

        Ok(BranchListing {
            current,
            local: parsers::parse_branch_names(&local.stdout),
            remote: parsers::parse_branch_names(&remote.stdout)
                .into_iter()
                // `origin/HEAD` shortens to plain `origin` on recent git
                .filter(|name| name.contains('/') && !name.ends_with("/HEAD"))
                .collect(),
        })
    }

    fn validate_message(&mut self, message: &str) -> Result<CommitMessage, WorkflowError> {
        let limit = self.settings.subject_max_len;
        self.check(
            Step::ValidateMessage,
            convention::commit::validate_with_limit(message, limit),
        )
    }

    fn validate_branch(&mut self, branch: &str) -> Result<String, WorkflowError> {
        self.check(
            Step::ValidateBranch,
            convention::validate_branch_name(branch).map(str::to_string),
        )
    }

    // --- actions ----------------------------------------------------------

    /// stage-all → validate → commit → render → push → render
    ///
    /// An invalid message aborts after staging; the staged changes stay
    /// staged so the caller can retry with a corrected message.
    async fn quick_commit_and_push(&mut self, message: &str) -> Result<(), WorkflowError> {
        self.exec(Step::StageAll, commands::stage_all()).await?;
        let message = self.validate_message(message)?;
        self.commit_and_push(&message).await
    }

    /// commit → render → push → render, for an already validated message
    async fn commit_and_push(&mut self, message: &CommitMessage) -> Result<(), WorkflowError> {
        let commit = self
            .mutate(
                Step::Commit,
                commands::commit(&message.to_string()),
                GraphScope::Local,
            )
            .await?;
        ensure_success(Step::Commit, &commit)?;

        self.push_current_branch().await
    }

    /// Push with `-u` the first time, when the branch has no upstream yet
    async fn push_current_branch(&mut self) -> Result<(), WorkflowError> {
        let branch = self
            .current_branch()
            .await?
            .ok_or(WorkflowError::DetachedHead)?;
        let has_upstream = self
            .probe(Step::CheckUpstream, commands::upstream())
            .await
            .success();

        let remote = self.settings.remote.clone();
        let push = self
            .mutate(
                Step::Push,
                commands::push(&remote, &branch, !has_upstream),
                GraphScope::All,
            )
            .await?;
        ensure_success(Step::Push, &push)
    }

    async fn create_branch_and_switch(&mut self, branch: &str) -> Result<(), WorkflowError> {
        let branch = self.validate_branch(branch)?;
        if self.local_branch_exists(&branch).await? {
            return self.check(
                Step::CheckBranch,
                Err(ValidationError::BranchExists(branch)),
            );
        }

        let created = self
            .mutate(
                Step::CreateBranch,
                commands::create_and_switch(&branch),
                GraphScope::Local,
            )
            .await?;
        ensure_success(Step::CreateBranch, &created)
    }

    /// The message is checked before the branch is created, so a bad message
    /// leaves the repository untouched.
    async fn commit_to_new_branch(&mut self, branch: &str, message: &str) -> Result<(), WorkflowError> {
        let message = self.validate_message(message)?;
        self.create_branch_and_switch(branch).await?;
        self.exec(Step::StageAll, commands::stage_all()).await?;
        self.commit_and_push(&message).await
    }

    /// render → merge → render; conflicts stop here for manual resolution
    async fn merge_branch(&mut self, branch: &str) -> Result<(), WorkflowError> {
        let branch = self.validate_branch(branch)?;
        self.render("before merge", GraphScope::All).await?;

        let merged = self
            .mutate(Step::Merge, commands::merge(&branch), GraphScope::All)
            .await?;
        if merged.success() {
            return Ok(());
        }

        match parsers::detect_conflict(&branch, &merged.stdout, &merged.stderr) {
            Some(report) => {
                warn!("Merge of '{}' stopped on conflicts", branch);
                Err(WorkflowError::ConflictDetected {
                    failure: CommandFailure::from_result(Step::Merge, &merged),
                    report,
                })
            }
            None => Err(CommandFailure::from_result(Step::Merge, &merged).into()),
        }
    }

    async fn fetch(&mut self) -> Result<(), WorkflowError> {
        let fetched = self
            .mutate(Step::Fetch, commands::fetch_all(), GraphScope::All)
            .await?;
        ensure_success(Step::Fetch, &fetched)
    }

    async fn switch_branch(&mut self, branch: &str) -> Result<(), WorkflowError> {
        let branch = self.validate_branch(branch)?;
        if !self.local_branch_exists(&branch).await? {
            return self.check(
                Step::CheckBranch,
                Err(ValidationError::BranchNotFound(branch)),
            );
        }

        let switched = self
            .mutate(
                Step::SwitchBranch,
                commands::switch(&branch),
                GraphScope::Local,
            )
            .await?;
        ensure_success(Step::SwitchBranch, &switched)
    }

    async fn pull(&mut self) -> Result<(), WorkflowError> {
        let branch = self
            .current_branch()
            .await?
            .ok_or(WorkflowError::DetachedHead)?;
        let remote = self.settings.remote.clone();

        let pulled = self
            .mutate(Step::Pull, commands::pull(&remote, &branch), GraphScope::All)
            .await?;
        if pulled.success() {
            return Ok(());
        }

        let source = format!("{remote}/{branch}");
        match parsers::detect_conflict(&source, &pulled.stdout, &pulled.stderr) {
            Some(report) => Err(WorkflowError::ConflictDetected {
                failure: CommandFailure::from_result(Step::Pull, &pulled),
                report,
            }),
            None => Err(CommandFailure::from_result(Step::Pull, &pulled).into()),
        }
    }

    async fn delete_branch(&mut self, branch: &str, remote: bool) -> Result<(), WorkflowError> {
        let branch = self.validate_branch(branch)?;
        if self.current_branch().await?.as_deref() == Some(branch.as_str()) {
            return self.check(
                Step::CheckBranch,
                Err(ValidationError::CurrentBranch(branch)),
            );
        }
        if !self.local_branch_exists(&branch).await? {
            return self.check(
                Step::CheckBranch,
                Err(ValidationError::BranchNotFound(branch)),
            );
        }

        let deleted = self
            .mutate(
                Step::DeleteBranch,
                commands::delete_branch(&branch),
                GraphScope::Local,
            )
            .await?;
        ensure_success(Step::DeleteBranch, &deleted)?;

        if remote {
            let remote_name = self.settings.remote.clone();
            let deleted = self
                .mutate(
                    Step::DeleteRemoteBranch,
                    commands::delete_remote_branch(&remote_name, &branch),
                    GraphScope::All,
                )
                .await?;
            ensure_success(Step::DeleteRemoteBranch, &deleted)?;
        }
        Ok(())
    }

    async fn setup_remote(&mut self, url: &str) -> Result<(), WorkflowError> {
        let url = url.trim();
        if url.is_empty() {
            return self.check(Step::CheckRemote, Err(ValidationError::EmptyRemoteUrl));
        }

        let remote = self.settings.remote.clone();
        let exists = self
            .probe(Step::CheckRemote, commands::remote_url(&remote))
            .await
            .success();

        let (step, tokens) = if exists {
            (Step::SetRemoteUrl, commands::set_remote_url(&remote, url))
        } else {
            (Step::AddRemote, commands::add_remote(&remote, url))
        };
        let configured = self.mutate(step, tokens, GraphScope::All).await?;
        ensure_success(step, &configured)
    }
}

fn ensure_success(step: Step, result: &CommandResult) -> Result<(), WorkflowError> {
    if result.success() {
        Ok(())
    } else {
        Err(CommandFailure::from_result(step, result).into())
    }
}

/// `git log` on a repository without commits fails; that is an empty graph,
/// not an error.
fn is_unborn_history(result: &CommandResult) -> bool {
    result.stderr.contains("does not have any commits yet")
        || result.stderr.contains("ambiguous argument 'HEAD'")
}
