//! Naming conventions enforced before anything touches the repository
//!
//! - `commit` - conventional-commit message grammar
//! - `branch` - branch name rules

pub mod branch;
pub mod commit;

pub use branch::validate_branch_name;
pub use commit::{validate, CommitMessage, CommitType, DEFAULT_SUBJECT_MAX_LEN};

use thiserror::Error;

/// A rule a commit message or branch name broke. Always recoverable: the
/// caller fixes the input and retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("commit message is empty")]
    EmptyMessage,

    #[error("missing type/colon separator (expected 'type(scope): subject')")]
    MissingSeparator,

    #[error("unknown commit type '{0}' (expected one of: {list})", list = CommitType::names().join(", "))]
    UnknownType(String),

    #[error("malformed scope in '{0}' (expected 'type(scope)')")]
    MalformedScope(String),

    #[error("scope must not be empty")]
    EmptyScope,

    #[error("subject must not be empty")]
    EmptySubject,

    #[error("subject is {len} characters, limit is {max}")]
    SubjectTooLong { len: usize, max: usize },

    #[error("body must be separated from the subject by a blank line")]
    MissingBlankLine,

    #[error("branch name must not be empty")]
    EmptyBranchName,

    #[error("invalid branch name '{name}': {reason}")]
    InvalidBranchName { name: String, reason: &'static str },

    #[error("branch '{0}' already exists")]
    BranchExists(String),

    #[error("branch '{0}' does not exist")]
    BranchNotFound(String),

    #[error("cannot delete '{0}': it is the current branch")]
    CurrentBranch(String),

    #[error("remote URL must not be empty")]
    EmptyRemoteUrl,
}

impl ValidationError {
    /// Short machine-readable rule name
    pub fn rule(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "empty-message",
            Self::MissingSeparator => "missing-separator",
            Self::UnknownType(_) => "unknown-type",
            Self::MalformedScope(_) => "malformed-scope",
            Self::EmptyScope => "empty-scope",
            Self::EmptySubject => "empty-subject",
            Self::SubjectTooLong { .. } => "subject-too-long",
            Self::MissingBlankLine => "missing-blank-line",
            Self::EmptyBranchName => "empty-branch-name",
            Self::InvalidBranchName { .. } => "invalid-branch-name",
            Self::BranchExists(_) => "branch-exists",
            Self::BranchNotFound(_) => "branch-not-found",
            Self::CurrentBranch(_) => "current-branch",
            Self::EmptyRemoteUrl => "empty-remote-url",
        }
    }
}
