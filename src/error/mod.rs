//! Structured failures returned by workflows
//!
//! Nothing here is fatal to the process: every error is a value handed back
//! to the caller, which decides whether to re-prompt, retry or stop.

use serde::Serialize;
use std::fmt;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

use crate::convention::ValidationError;
use crate::git::{CommandResult, ConflictReport};
use crate::workflow::Step;

/// A git command that exited non-zero, with everything needed to diagnose it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFailure {
    pub step: Step,
    /// Literal command line as run
    pub command: String,
    pub exit_code: i32,
    pub stderr: String,
    /// Some git failures ("nothing to commit") only report on stdout
    pub stdout: String,
}

impl CommandFailure {
    pub fn from_result(step: Step, result: &CommandResult) -> Self {
        Self {
            step,
            command: result.command_line(),
            exit_code: result.exit_code,
            stderr: result.stderr.clone(),
            stdout: result.stdout.clone(),
        }
    }

    /// stderr if git wrote any, stdout otherwise
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step '{}' failed: `{}` exited with status {}",
            self.step, self.command, self.exit_code
        )?;
        let diagnostic = self.diagnostic();
        if !diagnostic.is_empty() {
            write!(f, "\n{diagnostic}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum WorkflowError {
    Validation(#[serde(serialize_with = "serialize_display")] ValidationError),
    CommandFailure(CommandFailure),
    /// A merge or pull stopped on conflicts; `failure` is the command that did
    ConflictDetected {
        failure: CommandFailure,
        report: ConflictReport,
    },
    DetachedHead,
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[E{:04}] ", self.code())?;
        match self {
            Self::Validation(err) => write!(f, "Validation error: {err}"),
            Self::CommandFailure(failure) => write!(f, "{failure}"),
            Self::ConflictDetected { failure, report } => {
                write!(f, "Merge conflict: {report}")?;
                write!(
                    f,
                    "\n`{}` exited with status {} at step '{}'",
                    failure.command, failure.exit_code, failure.step
                )?;
                for detail in &report.details {
                    write!(f, "\n  {detail}")?;
                }
                let stderr = failure.stderr.trim();
                if !stderr.is_empty() {
                    write!(f, "\n{stderr}")?;
                }
                write!(f, "\nResolve the conflicts manually, then commit the result.")
            }
            Self::DetachedHead => write!(f, "HEAD is detached; check out a branch before pushing"),
        }
    }
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl WorkflowError {
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation(err) => match err {
                ValidationError::EmptyBranchName | ValidationError::InvalidBranchName { .. } => {
                    ErrorCode::VALIDATION_BRANCH_NAME
                }
                ValidationError::BranchExists(_)
                | ValidationError::BranchNotFound(_)
                | ValidationError::CurrentBranch(_) => ErrorCode::VALIDATION_BRANCH_STATE,
                ValidationError::EmptyRemoteUrl => ErrorCode::VALIDATION_REMOTE,
                _ => ErrorCode::VALIDATION_COMMIT_MESSAGE,
            },
            Self::CommandFailure(_) => ErrorCode::EXEC_COMMAND_FAILED,
            Self::ConflictDetected { .. } => ErrorCode::GIT_MERGE_CONFLICT,
            Self::DetachedHead => ErrorCode::GIT_DETACHED_HEAD,
        }
    }

    /// Validation errors are fixed by re-entering input; command failures and
    /// a detached HEAD by changing repository state and retrying. Conflicts
    /// need manual resolution first.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConflictDetected { .. })
    }

    /// Process exit status for the command-line front end
    pub fn exit_status(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::ConflictDetected { .. } => 3,
            Self::CommandFailure(_) | Self::DetachedHead => 1,
        }
    }

    /// Name of the step that failed, when one did
    pub fn failed_step(&self) -> Option<Step> {
        match self {
            Self::CommandFailure(failure) | Self::ConflictDetected { failure, .. } => {
                Some(failure.step)
            }
            Self::Validation(_) | Self::DetachedHead => None,
        }
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<CommandFailure> for WorkflowError {
    fn from(failure: CommandFailure) -> Self {
        Self::CommandFailure(failure)
    }
}

fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn failed_push() -> CommandResult {
        CommandResult {
            command: vec!["git".into(), "push".into(), "origin".into(), "main".into()],
            exit_code: 1,
            stdout: String::new(),
            stderr: "error: failed to push some refs to 'origin'\n".into(),
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_command_failure_includes_command_and_stderr() {
        let err = WorkflowError::from(CommandFailure::from_result(Step::Push, &failed_push()));
        let text = err.to_string();
        assert!(text.starts_with("[E4003]"));
        assert!(text.contains("`git push origin main`"));
        assert!(text.contains("failed to push some refs"));
        assert_eq!(err.failed_step(), Some(Step::Push));
        assert_eq!(err.exit_status(), 1);
    }

    #[test]
    fn test_diagnostic_falls_back_to_stdout() {
        let result = CommandResult {
            command: vec!["git".into(), "commit".into()],
            exit_code: 1,
            stdout: "nothing to commit, working tree clean\n".into(),
            stderr: String::new(),
            duration: Duration::ZERO,
        };
        let failure = CommandFailure::from_result(Step::Commit, &result);
        assert_eq!(failure.diagnostic(), "nothing to commit, working tree clean");
    }

    #[test]
    fn test_codes_and_recoverability() {
        let validation = WorkflowError::from(ValidationError::MissingSeparator);
        assert_eq!(validation.code(), ErrorCode::VALIDATION_COMMIT_MESSAGE);
        assert!(validation.is_recoverable());
        assert_eq!(validation.exit_status(), 2);

        let branch = WorkflowError::from(ValidationError::BranchExists("main".into()));
        assert_eq!(branch.code(), ErrorCode::VALIDATION_BRANCH_STATE);

        let merge = CommandResult {
            command: vec!["git".into(), "merge".into(), "feature".into()],
            exit_code: 1,
            stdout: "CONFLICT (content): Merge conflict in a.txt\n".into(),
            stderr: "error: could not apply\n".into(),
            duration: Duration::ZERO,
        };
        let conflict = WorkflowError::ConflictDetected {
            failure: CommandFailure::from_result(Step::Merge, &merge),
            report: ConflictReport {
                branch: "feature".into(),
                files: vec!["a.txt".into()],
                details: vec![],
            },
        };
        assert!(!conflict.is_recoverable());
        assert_eq!(conflict.exit_status(), 3);
        assert_eq!(conflict.failed_step(), Some(Step::Merge));
        let text = conflict.to_string();
        assert!(text.contains("a.txt"));
        assert!(text.contains("`git merge feature` exited with status 1"));
        assert!(text.contains("error: could not apply"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let err = WorkflowError::from(ValidationError::EmptySubject);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["detail"], "subject must not be empty");
    }
}
