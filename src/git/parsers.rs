//! Git output parsers

use once_cell::sync::Lazy;
use regex::Regex;

use super::commands::FIELD_SEPARATOR;
use super::types::{ConflictReport, Decoration, HistoryEntry};

/// `CONFLICT (content): Merge conflict in <file>` and the add/add variant
static MERGE_CONFLICT_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CONFLICT \([^)]+\): Merge conflict in (.+)$").expect("Valid regex pattern")
});

/// `CONFLICT (modify/delete): <file> deleted in <ref> and modified in <ref>.`
static DELETED_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CONFLICT \((?:modify/delete|delete/modify)\): (.+?) deleted in ")
        .expect("Valid regex pattern")
});

/// Parse `git log --graph` output produced with [`super::commands::LOG_FORMAT`].
///
/// Connector-only rows (`|\`, `|/`, ...) carry no commit and are skipped.
pub fn parse_log_graph(output: &str) -> Vec<HistoryEntry> {
    output.lines().filter_map(parse_log_line).collect()
}

fn parse_log_line(line: &str) -> Option<HistoryEntry> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let head = fields.next()?;
    let refs = fields.next()?;
    let relative_time = fields.next().unwrap_or("");
    let author = fields.next().unwrap_or("");
    // Subjects may themselves contain the separator; keep the remainder whole.
    let subject = fields
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR.to_string().as_str());

    let head = head.trim_end();
    let (marker, short_id) = match head.rsplit_once(' ') {
        Some((marker, id)) => (marker.trim_end(), id),
        None => ("", head),
    };
    if short_id.is_empty() {
        return None;
    }

    Some(HistoryEntry {
        marker: if marker.is_empty() {
            "*".to_string()
        } else {
            marker.to_string()
        },
        short_id: short_id.to_string(),
        decorations: parse_decorations(refs),
        relative_time: non_empty(relative_time),
        author: non_empty(author),
        subject: subject.trim_end().to_string(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a `%D` ref list, accepting both short and `--decorate=full` names.
///
/// `HEAD -> main` yields `Head` followed by `Local("main")`; duplicates are
/// dropped while keeping first-seen order.
pub fn parse_decorations(refs: &str) -> Vec<Decoration> {
    let mut decorations: Vec<Decoration> = Vec::new();
    let mut push = |decoration: Decoration| {
        if !decorations.contains(&decoration) {
            decorations.push(decoration);
        }
    };

    for item in refs.split(", ").map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(target) = item.strip_prefix("HEAD -> ") {
            push(Decoration::Head);
            push(classify_ref(target));
        } else {
            push(classify_ref(item));
        }
    }

    decorations
}

fn classify_ref(name: &str) -> Decoration {
    if name == "HEAD" {
        return Decoration::Head;
    }
    if let Some(tag) = name.strip_prefix("tag: ") {
        let tag = tag.strip_prefix("refs/tags/").unwrap_or(tag);
        return Decoration::Tag(tag.to_string());
    }
    if let Some(tag) = name.strip_prefix("refs/tags/") {
        return Decoration::Tag(tag.to_string());
    }
    if let Some(branch) = name.strip_prefix("refs/heads/") {
        return Decoration::Local(branch.to_string());
    }
    if let Some(remote) = name.strip_prefix("refs/remotes/") {
        return Decoration::Remote(remote.to_string());
    }
    if name.starts_with("refs/") {
        return Decoration::Other(name.to_string());
    }
    Decoration::Local(name.to_string())
}

/// Branch names, one per line, with `git branch` current markers stripped
pub fn parse_branch_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_start_matches(['*', '+']).trim())
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

/// Recognise a merge that stopped on conflicts.
///
/// Git prints `CONFLICT (...)` lines and the "Automatic merge failed" notice
/// on stdout; other merge failures (dirty tree, unknown branch) print neither.
pub fn detect_conflict(branch: &str, stdout: &str, stderr: &str) -> Option<ConflictReport> {
    let mut details = Vec::new();
    let mut files = Vec::new();
    let mut auto_merge_failed = false;

    for line in stdout.lines().chain(stderr.lines()) {
        let line = line.trim();
        if line.starts_with("CONFLICT (") {
            let file = MERGE_CONFLICT_IN
                .captures(line)
                .or_else(|| DELETED_IN.captures(line))
                .map(|caps| caps[1].trim().to_string());
            if let Some(file) = file.filter(|f| !files.contains(f)) {
                files.push(file);
            }
            details.push(line.to_string());
        } else if line.starts_with("Automatic merge failed") {
            auto_merge_failed = true;
        }
    }

    if details.is_empty() && !auto_merge_failed {
        return None;
    }

    Some(ConflictReport {
        branch: branch.to_string(),
        files,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const US: char = FIELD_SEPARATOR;

    fn row(graph: &str, id: &str, refs: &str, time: &str, author: &str, subject: &str) -> String {
        format!("{graph}{id}{US}{refs}{US}{time}{US}{author}{US}{subject}")
    }

    #[test]
    fn test_parse_log_graph_rows_and_connectors() {
        let output = [
            row(
                "* ",
                "a1b2c3d",
                "HEAD -> refs/heads/main, refs/remotes/origin/main, tag: refs/tags/v1.0",
                "2 hours ago",
                "Alice",
                "feat(auth): add login",
            ),
            "|\\  ".to_string(),
            row("| * ", "e4f5a6b", "refs/heads/feature", "3 days ago", "Bob", "fix: typo"),
            "|/  ".to_string(),
            row("* ", "0c0ffee", "", "5 days ago", "Alice", "chore: init"),
        ]
        .join("\n");

        let entries = parse_log_graph(&output);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].marker, "*");
        assert_eq!(entries[0].short_id, "a1b2c3d");
        assert_eq!(
            entries[0].decorations,
            vec![
                Decoration::Head,
                Decoration::Local("main".into()),
                Decoration::Remote("origin/main".into()),
                Decoration::Tag("v1.0".into()),
            ]
        );
        assert_eq!(entries[0].relative_time.as_deref(), Some("2 hours ago"));
        assert_eq!(entries[0].author.as_deref(), Some("Alice"));
        assert_eq!(entries[0].subject, "feat(auth): add login");

        assert_eq!(entries[1].marker, "| *");
        assert!(entries[2].decorations.is_empty());
    }

    #[test]
    fn test_parse_log_graph_merge_row_padding() {
        let output = row("*   ", "9f9f9f9", "", "1 minute ago", "Carol", "Merge branch 'feature'");
        let entries = parse_log_graph(&output);
        assert_eq!(entries[0].marker, "*");
        assert_eq!(entries[0].short_id, "9f9f9f9");
    }

    #[test]
    fn test_parse_log_graph_missing_author() {
        let output = row("* ", "1234567", "", "", "", "subject only");
        let entries = parse_log_graph(&output);
        assert_eq!(entries[0].author, None);
        assert_eq!(entries[0].relative_time, None);
        assert_eq!(entries[0].subject, "subject only");
    }

    #[test]
    fn test_parse_log_graph_empty_output() {
        assert!(parse_log_graph("").is_empty());
    }

    #[test]
    fn test_parse_decorations_short_names() {
        assert_eq!(
            parse_decorations("HEAD -> main, origin/HEAD, tag: v2"),
            vec![
                Decoration::Head,
                Decoration::Local("main".into()),
                Decoration::Local("origin/HEAD".into()),
                Decoration::Tag("v2".into()),
            ]
        );
    }

    #[test]
    fn test_parse_decorations_detached_and_duplicates() {
        assert_eq!(
            parse_decorations("HEAD, refs/heads/main, refs/heads/main, refs/stash"),
            vec![
                Decoration::Head,
                Decoration::Local("main".into()),
                Decoration::Other("refs/stash".into()),
            ]
        );
        assert!(parse_decorations("").is_empty());
    }

    #[test]
    fn test_parse_branch_names() {
        let output = "* main\n  feature/login\n+ worktree-branch\n* (HEAD detached at 1234567)\n\n";
        assert_eq!(
            parse_branch_names(output),
            vec!["main", "feature/login", "worktree-branch"]
        );
    }

    #[test]
    fn test_detect_conflict_content() {
        let stdout = "Auto-merging src/lib.rs\n\
                      CONFLICT (content): Merge conflict in src/lib.rs\n\
                      CONFLICT (content): Merge conflict in README.md\n\
                      Automatic merge failed; fix conflicts and then commit the result.\n";
        let report = detect_conflict("feature", stdout, "").unwrap();
        assert_eq!(report.branch, "feature");
        assert_eq!(report.files, vec!["src/lib.rs", "README.md"]);
        assert_eq!(report.details.len(), 2);
    }

    #[test]
    fn test_detect_conflict_modify_delete() {
        let stdout = "CONFLICT (modify/delete): a.txt deleted in HEAD and modified in feature. \
                      Version feature of a.txt left in tree.\n";
        let report = detect_conflict("feature", stdout, "").unwrap();
        assert_eq!(report.files, vec!["a.txt"]);
        assert_eq!(report.details.len(), 1);
    }

    #[test]
    fn test_detect_conflict_ignores_other_failures() {
        assert!(detect_conflict("nope", "", "merge: nope - not something we can merge\n").is_none());
    }
}
