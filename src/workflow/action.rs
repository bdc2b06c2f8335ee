use crate::git::GraphScope;
use serde::Serialize;

/// A high-level request, built from caller input and consumed by exactly one
/// [`super::WorkflowOrchestrator::execute`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Stage everything, commit with a validated message, push the current branch
    QuickCommitAndPush { message: String },
    /// Create a new local branch and check it out
    CreateBranchAndSwitch { branch: String },
    /// [`Self::CreateBranchAndSwitch`] followed by [`Self::QuickCommitAndPush`]
    CommitToNewBranch { branch: String, message: String },
    /// Merge `branch` into the current branch
    MergeBranch { branch: String },
    /// Fetch all remotes
    Fetch,
    /// Check out an existing local branch
    SwitchBranch { branch: String },
    /// Pull the current branch from the configured remote
    Pull,
    /// Delete a local branch, and optionally its counterpart on the remote
    DeleteBranch { branch: String, remote: bool },
    /// Add the configured remote, or point it at a new URL
    SetupRemote { url: String },
    /// Render the graph without changing anything
    ShowGraph { scope: GraphScope },
}

impl WorkflowAction {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowAction::QuickCommitAndPush { .. } => "quick-commit-and-push",
            WorkflowAction::CreateBranchAndSwitch { .. } => "create-branch-and-switch",
            WorkflowAction::CommitToNewBranch { .. } => "commit-to-new-branch",
            WorkflowAction::MergeBranch { .. } => "merge-branch",
            WorkflowAction::Fetch => "fetch",
            WorkflowAction::SwitchBranch { .. } => "switch-branch",
            WorkflowAction::Pull => "pull",
            WorkflowAction::DeleteBranch { .. } => "delete-branch",
            WorkflowAction::SetupRemote { .. } => "setup-remote",
            WorkflowAction::ShowGraph { .. } => "show-graph",
        }
    }
}
