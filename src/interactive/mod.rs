//! Numbered menu for running workflows by hand
//!
//! The menu only gathers parameters and builds a [`WorkflowAction`]; the
//! orchestrator does all sequencing.

pub mod prompts;

pub use prompts::{StdinPrompter, UserPrompter};

use anyhow::Result;
use std::io::Write;
use tracing::debug;

use crate::alias::AliasInstaller;
use crate::convention::{CommitMessage, CommitType};
use crate::error::WorkflowError;
use crate::git::{BranchListing, GraphScope};
use crate::workflow::{WorkflowAction, WorkflowOrchestrator, WorkflowReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    QuickCommit,
    NewBranch,
    SwitchBranch,
    CommitToNewBranch,
    Branches,
    Pull,
    Merge,
    DeleteBranch,
    SetupRemote,
    Fetch,
    Graph,
    SetupAliases,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 13] = [
        MenuItem::QuickCommit,
        MenuItem::NewBranch,
        MenuItem::SwitchBranch,
        MenuItem::CommitToNewBranch,
        MenuItem::Branches,
        MenuItem::Pull,
        MenuItem::Merge,
        MenuItem::DeleteBranch,
        MenuItem::SetupRemote,
        MenuItem::Fetch,
        MenuItem::Graph,
        MenuItem::SetupAliases,
        MenuItem::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::QuickCommit => "Quick commit & push to current branch",
            MenuItem::NewBranch => "Create new branch and switch",
            MenuItem::SwitchBranch => "Switch to existing branch",
            MenuItem::CommitToNewBranch => "Commit to new branch (create + commit + push)",
            MenuItem::Branches => "View all branches",
            MenuItem::Pull => "Pull latest from remote",
            MenuItem::Merge => "Merge branch",
            MenuItem::DeleteBranch => "Delete branch",
            MenuItem::SetupRemote => "Setup remote",
            MenuItem::Fetch => "Fetch all remotes",
            MenuItem::Graph => "Show branch graph",
            MenuItem::SetupAliases => "Setup git aliases",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Write every rendered graph of a report, then its failure if any
pub fn write_report<W: Write>(out: &mut W, report: &WorkflowReport) -> std::io::Result<()> {
    for snapshot in &report.snapshots {
        writeln!(out, "{snapshot}")?;
    }
    match &report.error {
        Some(error) => writeln!(out, "{error}"),
        None => Ok(()),
    }
}

pub struct InteractiveSession<'a, W: Write + Send> {
    orchestrator: &'a WorkflowOrchestrator,
    aliases: &'a AliasInstaller,
    prompter: &'a dyn UserPrompter,
    out: W,
}

impl<'a, W: Write + Send> InteractiveSession<'a, W> {
    pub fn new(
        orchestrator: &'a WorkflowOrchestrator,
        aliases: &'a AliasInstaller,
        prompter: &'a dyn UserPrompter,
        out: W,
    ) -> Self {
        Self {
            orchestrator,
            aliases,
            prompter,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Show the menu until the user picks Exit or input runs out
    pub async fn run(&mut self) -> Result<()> {
        let labels: Vec<String> = MenuItem::ALL
            .iter()
            .map(|item| item.label().to_string())
            .collect();

        loop {
            self.header().await?;
            let index = self.prompter.prompt_choice("Options:", &labels).await?;
            let item = MenuItem::ALL[index];
            debug!("Menu choice: {:?}", item);

            if item == MenuItem::Exit {
                writeln!(self.out, "Goodbye!")?;
                return Ok(());
            }
            self.handle(item).await?;
        }
    }

    async fn header(&mut self) -> Result<()> {
        let rule = "=".repeat(50);
        writeln!(self.out, "\n{rule}")?;
        writeln!(self.out, "GIT BRANCH & COMMIT MANAGER")?;
        writeln!(self.out, "{rule}")?;
        match self.orchestrator.branches().await {
            Ok(listing) => writeln!(
                self.out,
                "Current branch: {}",
                listing.current.as_deref().unwrap_or("(detached)")
            )?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    async fn handle(&mut self, item: MenuItem) -> Result<()> {
        match item {
            MenuItem::Branches => {
                match self.orchestrator.branches().await {
                    Ok(listing) => write!(self.out, "{listing}")?,
                    Err(error) => writeln!(self.out, "{error}")?,
                }
                return Ok(());
            }
            MenuItem::SetupAliases => {
                match self.aliases.install().await {
                    Ok(outcomes) => {
                        for outcome in outcomes {
                            writeln!(self.out, "{outcome}")?;
                        }
                    }
                    Err(failure) => writeln!(self.out, "{failure}")?,
                }
                return Ok(());
            }
            _ => {}
        }

        loop {
            let Some(action) = self.gather(item).await? else {
                return Ok(());
            };

            let report = self.orchestrator.execute(action).await;
            write_report(&mut self.out, &report)?;

            let retry = matches!(report.error, Some(WorkflowError::Validation(_)))
                && self.prompter.prompt_yes_no("Try again?").await?;
            if !retry {
                return Ok(());
            }
        }
    }

    /// Ask for whatever `item` needs. `None` when the user backs out or
    /// there is nothing to choose from.
    async fn gather(&mut self, item: MenuItem) -> Result<Option<WorkflowAction>> {
        let action = match item {
            MenuItem::QuickCommit => self
                .compose_message()
                .await?
                .map(|message| WorkflowAction::QuickCommitAndPush { message }),
            MenuItem::NewBranch => self
                .branch_name()
                .await?
                .map(|branch| WorkflowAction::CreateBranchAndSwitch { branch }),
            MenuItem::CommitToNewBranch => {
                let Some(branch) = self.branch_name().await? else {
                    return Ok(None);
                };
                self.compose_message()
                    .await?
                    .map(|message| WorkflowAction::CommitToNewBranch { branch, message })
            }
            MenuItem::SwitchBranch => self
                .pick_other_branch("Switch to branch:")
                .await?
                .map(|branch| WorkflowAction::SwitchBranch { branch }),
            MenuItem::Merge => {
                let Some(branch) = self.pick_other_branch("Branch to merge:").await? else {
                    return Ok(None);
                };
                let question = format!("Merge '{branch}' into the current branch?");
                self.confirm(&question)
                    .await?
                    .then_some(WorkflowAction::MergeBranch { branch })
            }
            MenuItem::DeleteBranch => {
                let Some(branch) = self.pick_other_branch("Branch to delete:").await? else {
                    return Ok(None);
                };
                if !self.confirm(&format!("Delete branch '{branch}'?")).await? {
                    return Ok(None);
                }
                let remote = self
                    .prompter
                    .prompt_yes_no("Also delete from remote?")
                    .await?;
                Some(WorkflowAction::DeleteBranch { branch, remote })
            }
            MenuItem::SetupRemote => {
                let remote = self.orchestrator.settings().remote.clone();
                let url = self
                    .prompter
                    .prompt_text(&format!("URL for remote '{remote}'"), None)
                    .await?;
                Some(WorkflowAction::SetupRemote { url })
            }
            MenuItem::Pull => Some(WorkflowAction::Pull),
            MenuItem::Fetch => Some(WorkflowAction::Fetch),
            MenuItem::Graph => {
                let all = self
                    .prompter
                    .prompt_yes_no("Include remote branches?")
                    .await?;
                Some(WorkflowAction::ShowGraph {
                    scope: if all { GraphScope::All } else { GraphScope::Local },
                })
            }
            MenuItem::Branches | MenuItem::SetupAliases | MenuItem::Exit => None,
        };
        Ok(action)
    }

    async fn confirm(&mut self, question: &str) -> Result<bool> {
        let confirmed = self.prompter.prompt_yes_no(question).await?;
        if !confirmed {
            writeln!(self.out, "Cancelled")?;
        }
        Ok(confirmed)
    }

    async fn branch_name(&mut self) -> Result<Option<String>> {
        let name = self.prompter.prompt_text("Branch name", None).await?;
        Ok((!name.trim().is_empty()).then(|| name.trim().to_string()))
    }

    /// Build a conventional message from type, scope and subject. Re-asks
    /// while the parts break the convention, unless the user gives up.
    async fn compose_message(&mut self) -> Result<Option<String>> {
        let labels: Vec<String> = CommitType::ALL
            .iter()
            .map(|kind| format!("{:<9}{}", kind.as_str(), kind.description()))
            .collect();

        loop {
            let kind = CommitType::ALL[self.prompter.prompt_choice("Commit type:", &labels).await?];
            let scope = self.prompter.prompt_text("Scope (optional)", None).await?;
            let subject = self.prompter.prompt_text("Subject", None).await?;

            let scope = Some(scope.trim()).filter(|s| !s.is_empty());
            match CommitMessage::new(kind, scope, &subject) {
                Ok(message) => return Ok(Some(message.to_string())),
                Err(error) => {
                    writeln!(self.out, "Invalid commit message: {error}")?;
                    if !self.prompter.prompt_yes_no("Try again?").await? {
                        return Ok(None);
                    }
                }
            }
        }
    }

    async fn pick_other_branch(&mut self, message: &str) -> Result<Option<String>> {
        let listing = match self.orchestrator.branches().await {
            Ok(listing) => listing,
            Err(error) => {
                writeln!(self.out, "{error}")?;
                return Ok(None);
            }
        };

        let candidates = other_branches(&listing);
        if candidates.is_empty() {
            writeln!(self.out, "No other local branches")?;
            return Ok(None);
        }

        let index = self.prompter.prompt_choice(message, &candidates).await?;
        Ok(candidates.into_iter().nth(index))
    }
}

fn other_branches(listing: &BranchListing) -> Vec<String> {
    listing
        .local
        .iter()
        .filter(|branch| listing.current.as_deref() != Some(branch.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::prompts::mock::MockPrompter;
    use super::*;
    use crate::alias::AliasScope;
    use crate::git::{ScenarioResponse, ScenarioRunner};
    use std::sync::Arc;

    const EXIT: &str = "13";

    struct Harness {
        runner: ScenarioRunner,
        orchestrator: WorkflowOrchestrator,
        aliases: AliasInstaller,
    }

    impl Harness {
        async fn new() -> Self {
            let runner = ScenarioRunner::new();
            runner
                .when(
                    |tokens| tokens.iter().any(|t| t == "--show-current"),
                    ScenarioResponse::ok("main\n"),
                    None,
                )
                .await;
            runner
                .when(
                    |tokens| tokens.iter().any(|t| t == "--remotes"),
                    ScenarioResponse::ok(""),
                    None,
                )
                .await;
            let shared: Arc<dyn crate::git::CommandRunner> = Arc::new(runner.clone());
            Self {
                orchestrator: WorkflowOrchestrator::new(shared.clone()),
                aliases: AliasInstaller::new(shared, AliasScope::Local),
                runner,
            }
        }

        async fn with_local_branches(self, names: &str) -> Self {
            self.runner
                .when(
                    |tokens| tokens.iter().any(|t| t.starts_with("--format")),
                    ScenarioResponse::ok(names.to_string()),
                    None,
                )
                .await;
            self
        }

        async fn run(&self, answers: &[&str]) -> String {
            let prompter = MockPrompter::new(answers.iter().copied());
            let mut session =
                InteractiveSession::new(&self.orchestrator, &self.aliases, &prompter, Vec::new());
            session.run().await.unwrap();
            assert_eq!(prompter.remaining(), 0);
            String::from_utf8(session.into_output()).unwrap()
        }

        async fn commands_with(&self, subcommand: &str) -> Vec<Vec<String>> {
            self.runner
                .get_command_log()
                .await
                .into_iter()
                .filter(|tokens| tokens[1] == subcommand)
                .collect()
        }
    }

    #[test]
    fn test_menu_has_exit_last() {
        assert_eq!(MenuItem::ALL.len(), 13);
        assert_eq!(MenuItem::ALL[12], MenuItem::Exit);
    }

    #[tokio::test]
    async fn test_exit_immediately() {
        let harness = Harness::new().await;
        let output = harness.run(&[EXIT]).await;
        assert!(output.contains("Current branch: main"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_quick_commit_composes_message() {
        let harness = Harness::new().await;

        // menu, type 1 (feat), scope, subject, exit
        let output = harness.run(&["1", "1", "auth", "add login", EXIT]).await;

        let commits = harness.commands_with("commit").await;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0][3], "feat(auth): add login");
        assert!(output.contains("GIT BRANCH GRAPH (after commit)"));
    }

    #[tokio::test]
    async fn test_invalid_subject_can_be_abandoned() {
        let harness = Harness::new().await;

        let output = harness.run(&["1", "2", "", "   ", "n", EXIT]).await;

        assert!(output.contains("Invalid commit message: subject must not be empty"));
        assert!(harness.commands_with("commit").await.is_empty());
    }

    #[tokio::test]
    async fn test_merge_requires_confirmation() {
        let harness = Harness::new().await.with_local_branches("develop\nmain\n").await;

        let output = harness.run(&["7", "1", "n", EXIT]).await;

        assert!(output.contains("Cancelled"));
        assert!(harness.commands_with("merge").await.is_empty());
    }

    #[tokio::test]
    async fn test_merge_picks_from_other_branches() {
        let harness = Harness::new().await.with_local_branches("develop\nmain\n").await;

        harness.run(&["7", "1", "y", EXIT]).await;

        let merges = harness.commands_with("merge").await;
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].last().map(String::as_str), Some("develop"));
    }

    #[tokio::test]
    async fn test_switch_without_other_branches() {
        let harness = Harness::new().await.with_local_branches("main\n").await;

        let output = harness.run(&["3", EXIT]).await;

        assert!(output.contains("No other local branches"));
        assert!(harness.commands_with("checkout").await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_branch_name_offers_retry() {
        let harness = Harness::new().await;

        let output = harness
            .run(&["2", "bad..name", "y", "feature/ok", EXIT])
            .await;

        assert!(output.contains("invalid branch name 'bad..name'"));
        let checkouts = harness.commands_with("checkout").await;
        assert_eq!(checkouts.len(), 1);
        assert_eq!(checkouts[0][3], "feature/ok");
    }

    #[tokio::test]
    async fn test_branches_listing_marks_current() {
        let harness = Harness::new().await.with_local_branches("develop\nmain\n").await;

        let output = harness.run(&["5", EXIT]).await;

        assert!(output.contains("→ main"));
        assert!(output.contains("  develop"));
    }

    #[tokio::test]
    async fn test_setup_aliases_reports_each() {
        let harness = Harness::new().await;
        harness
            .runner
            .when(
                |tokens| tokens.iter().any(|t| t == "--get"),
                ScenarioResponse::fail(1, ""),
                None,
            )
            .await;

        let output = harness.run(&["12", EXIT]).await;

        assert!(output.contains("graph: installed"));
        assert!(output.contains("branches: installed"));
    }
}
