//! A rendered graph together with the step that triggered it

use crate::git::{GraphScope, HistoryEntry};
use serde::Serialize;
use std::fmt;

const FRAME_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    /// What the graph is shown after, e.g. `after commit`
    pub label: String,
    pub scope: GraphScope,
    pub entries: Vec<HistoryEntry>,
    /// Rendered lines, ready to print
    pub text: String,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for GraphSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(FRAME_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "GIT BRANCH GRAPH ({})", self.label)?;
        writeln!(f, "{rule}")?;
        if self.text.is_empty() {
            writeln!(f, "(no commits yet)")?;
        } else {
            writeln!(f, "{}", self.text)?;
        }
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_output() {
        let snapshot = GraphSnapshot {
            label: "after commit".to_string(),
            scope: GraphScope::Local,
            entries: vec![HistoryEntry::new("abc1234", "feat: x")],
            text: "* abc1234 feat: x".to_string(),
        };
        insta::assert_snapshot!(snapshot.to_string(), @r"
        ================================================================================
        GIT BRANCH GRAPH (after commit)
        ================================================================================
        * abc1234 feat: x
        ================================================================================
        ");
    }

    #[test]
    fn test_empty_history() {
        let snapshot = GraphSnapshot {
            label: "after fetch".to_string(),
            scope: GraphScope::All,
            entries: Vec::new(),
            text: String::new(),
        };
        assert!(snapshot.is_empty());
        assert!(snapshot.to_string().contains("(no commits yet)"));
    }
}
