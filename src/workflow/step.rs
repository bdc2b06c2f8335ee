//! Named steps of a workflow and the record each one leaves behind

use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    StageAll,
    ValidateMessage,
    ValidateBranch,
    CheckBranch,
    CurrentBranch,
    CheckUpstream,
    CheckRemote,
    ListBranches,
    Commit,
    Push,
    CreateBranch,
    SwitchBranch,
    Merge,
    Fetch,
    Pull,
    DeleteBranch,
    DeleteRemoteBranch,
    AddRemote,
    SetRemoteUrl,
    Graph,
    /// Alias setup; touches git configuration, not history
    ConfigureAlias,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::StageAll => "stage-all",
            Step::ValidateMessage => "validate-message",
            Step::ValidateBranch => "validate-branch",
            Step::CheckBranch => "check-branch",
            Step::CurrentBranch => "current-branch",
            Step::CheckUpstream => "check-upstream",
            Step::CheckRemote => "check-remote",
            Step::ListBranches => "list-branches",
            Step::Commit => "commit",
            Step::Push => "push",
            Step::CreateBranch => "create-branch",
            Step::SwitchBranch => "switch-branch",
            Step::Merge => "merge",
            Step::Fetch => "fetch",
            Step::Pull => "pull",
            Step::DeleteBranch => "delete-branch",
            Step::DeleteRemoteBranch => "delete-remote-branch",
            Step::AddRemote => "add-remote",
            Step::SetRemoteUrl => "set-remote-url",
            Step::Graph => "graph",
            Step::ConfigureAlias => "configure-alias",
        }
    }

    /// Steps that change repository state and therefore must be followed by
    /// a graph render
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Step::Commit
                | Step::Push
                | Step::CreateBranch
                | Step::SwitchBranch
                | Step::Merge
                | Step::Fetch
                | Step::Pull
                | Step::DeleteBranch
                | Step::DeleteRemoteBranch
                | Step::AddRemote
                | Step::SetRemoteUrl
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    Failed,
}

/// One step as it actually ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    /// Command line, absent for pure checks
    pub command: Option<String>,
    pub exit_code: Option<i32>,
    pub status: StepStatus,
    pub duration: Duration,
}

impl StepRecord {
    pub fn succeeded(&self) -> bool {
        self.status == StepStatus::Succeeded
    }
}
