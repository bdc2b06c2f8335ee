//! Git data structures

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Outcome of one invocation of the version-control engine.
///
/// A non-zero `exit_code` is an ordinary value here; callers decide what it
/// means for the action in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Full token list, program first
    pub command: Vec<String>,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Shell-quoted form of the command, as a user would type it
    pub fn command_line(&self) -> String {
        shell_words::join(&self.command)
    }
}

/// A ref label attached to a commit in history output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Decoration {
    Head,
    Local(String),
    Remote(String),
    Tag(String),
    Other(String),
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoration::Head => write!(f, "HEAD"),
            Decoration::Local(name) | Decoration::Remote(name) | Decoration::Other(name) => {
                write!(f, "{name}")
            }
            Decoration::Tag(name) => write!(f, "tag: {name}"),
        }
    }
}

/// One commit row from `git log --graph`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Graph column prefix, e.g. `*` or `| *`
    pub marker: String,
    pub short_id: String,
    /// Ordered, duplicate-free
    pub decorations: Vec<Decoration>,
    pub relative_time: Option<String>,
    pub author: Option<String>,
    pub subject: String,
}

impl HistoryEntry {
    pub fn new(short_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            marker: "*".to_string(),
            short_id: short_id.into(),
            decorations: Vec::new(),
            relative_time: None,
            author: None,
            subject: subject.into(),
        }
    }

    pub fn with_decorations(mut self, decorations: Vec<Decoration>) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn with_time(mut self, relative_time: impl Into<String>) -> Self {
        self.relative_time = Some(relative_time.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }
}

/// Which refs a graph render walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphScope {
    /// Local branches, tags and HEAD
    #[default]
    Local,
    /// Everything, remote-tracking branches included
    All,
}

/// Local and remote branches with the checked-out one marked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchListing {
    pub current: Option<String>,
    pub local: Vec<String>,
    pub remote: Vec<String>,
}

impl fmt::Display for BranchListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Local branches:")?;
        for branch in &self.local {
            let marker = if self.current.as_deref() == Some(branch.as_str()) {
                "→"
            } else {
                " "
            };
            writeln!(f, "{marker} {branch}")?;
        }
        if !self.remote.is_empty() {
            writeln!(f)?;
            writeln!(f, "Remote branches:")?;
            for branch in &self.remote {
                writeln!(f, "  {branch}")?;
            }
        }
        Ok(())
    }
}

/// Files and engine messages describing an unresolved merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub branch: String,
    pub files: Vec<String>,
    /// Raw `CONFLICT (...)` lines as printed by git
    pub details: Vec<String>,
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "merging '{}' left conflicts", self.branch)?;
        if !self.files.is_empty() {
            write!(f, " in {}", self.files.join(", "))?;
        }
        Ok(())
    }
}
