//! Conventional-commit message grammar
//!
//! ```text
//! type(scope): subject
//!
//! optional body
//! ```
//!
//! `type` is one of a fixed lowercase vocabulary, `(scope)` is optional but
//! must be non-empty when present, and the subject follows `": "`.

use super::ValidationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Longest subject accepted unless configured otherwise
pub const DEFAULT_SUBJECT_MAX_LEN: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
    Perf,
    Ci,
    Revert,
}

impl CommitType {
    pub const ALL: [CommitType; 10] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Test,
        CommitType::Chore,
        CommitType::Perf,
        CommitType::Ci,
        CommitType::Revert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Perf => "perf",
            CommitType::Ci => "ci",
            CommitType::Revert => "revert",
        }
    }

    /// One-line explanation shown when picking a type interactively
    pub fn description(&self) -> &'static str {
        match self {
            CommitType::Feat => "New feature",
            CommitType::Fix => "Bug fix",
            CommitType::Docs => "Documentation",
            CommitType::Style => "Code style",
            CommitType::Refactor => "Code refactoring",
            CommitType::Test => "Add tests",
            CommitType::Chore => "Maintenance",
            CommitType::Perf => "Performance",
            CommitType::Ci => "CI/CD changes",
            CommitType::Revert => "Revert a previous commit",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(CommitType::as_str).collect()
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitType {
    type Err = ValidationError;

    /// Case-sensitive: `Feat` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownType(s.to_string()))
    }
}

/// A message that satisfied the grammar. Only produced by [`validate`] and
/// [`CommitMessage::new`], so holding one means the rules were checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitMessage {
    commit_type: CommitType,
    scope: Option<String>,
    subject: String,
    body: Option<String>,
}

impl CommitMessage {
    /// Compose a message from its parts, applying the same rules as [`validate`].
    pub fn new(
        commit_type: CommitType,
        scope: Option<&str>,
        subject: &str,
    ) -> Result<Self, ValidationError> {
        let scope = match scope.map(str::trim) {
            Some("") => return Err(ValidationError::EmptyScope),
            Some(scope) => Some(scope.to_string()),
            None => None,
        };
        let subject = check_subject(subject, DEFAULT_SUBJECT_MAX_LEN)?;
        Ok(Self {
            commit_type,
            scope,
            subject,
            body: None,
        })
    }

    pub fn with_body(mut self, body: &str) -> Self {
        let body = body.trim();
        self.body = (!body.is_empty()).then(|| body.to_string());
        self
    }

    pub fn commit_type(&self) -> CommitType {
        self.commit_type
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// `type(scope): subject` without the body
    pub fn header(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}({}): {}", self.commit_type, scope, self.subject),
            None => format!("{}: {}", self.commit_type, self.subject),
        }
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header())?;
        if let Some(body) = &self.body {
            write!(f, "\n\n{body}")?;
        }
        Ok(())
    }
}

/// Validate with the default subject limit
pub fn validate(raw: &str) -> Result<CommitMessage, ValidationError> {
    validate_with_limit(raw, DEFAULT_SUBJECT_MAX_LEN)
}

/// Parse `raw` against the grammar. Pure; rules are checked in the order
/// empty, separator, scope, type, subject, body layout.
pub fn validate_with_limit(raw: &str, max_subject_len: usize) -> Result<CommitMessage, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }

    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default().trim_end();

    let (prefix, rest) = header
        .split_once(':')
        .ok_or(ValidationError::MissingSeparator)?;

    let (type_token, scope) = split_scope(prefix)?;
    if type_token.trim().is_empty() {
        return Err(ValidationError::MissingSeparator);
    }
    let commit_type: CommitType = type_token.parse()?;

    if rest.trim().is_empty() {
        return Err(ValidationError::EmptySubject);
    }
    let subject = rest
        .strip_prefix(' ')
        .ok_or(ValidationError::MissingSeparator)?;
    let subject = check_subject(subject, max_subject_len)?;

    let body = match lines.next() {
        None => None,
        Some(separator) if separator.trim().is_empty() => {
            let body = lines.collect::<Vec<_>>().join("\n");
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        }
        Some(_) => return Err(ValidationError::MissingBlankLine),
    };

    Ok(CommitMessage {
        commit_type,
        scope,
        subject,
        body,
    })
}

fn split_scope(prefix: &str) -> Result<(&str, Option<String>), ValidationError> {
    let Some(open) = prefix.find('(') else {
        if prefix.contains(')') {
            return Err(ValidationError::MalformedScope(prefix.to_string()));
        }
        return Ok((prefix, None));
    };

    let inner = prefix[open + 1..]
        .strip_suffix(')')
        .filter(|inner| !inner.contains(['(', ')']))
        .ok_or_else(|| ValidationError::MalformedScope(prefix.to_string()))?;

    if inner.trim().is_empty() {
        return Err(ValidationError::EmptyScope);
    }

    Ok((&prefix[..open], Some(inner.trim().to_string())))
}

fn check_subject(subject: &str, max_len: usize) -> Result<String, ValidationError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(ValidationError::EmptySubject);
    }
    let len = subject.chars().count();
    if len > max_len {
        return Err(ValidationError::SubjectTooLong { len, max: max_len });
    }
    Ok(subject.to_string())
}
