//! Text rendering of branch/commit history
//!
//! Presentation only: entries are printed in the order the engine returned
//! them, one line each, and nothing here can fail.

pub mod snapshot;

pub use snapshot::GraphSnapshot;

use crate::git::HistoryEntry;
use colored::Colorize;

/// Default author column limit
pub const DEFAULT_AUTHOR_WIDTH: usize = 20;
/// Default subject column limit
pub const DEFAULT_SUBJECT_WIDTH: usize = 72;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub author_width: usize,
    pub subject_width: usize,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            author_width: DEFAULT_AUTHOR_WIDTH,
            subject_width: DEFAULT_SUBJECT_WIDTH,
            color: false,
        }
    }
}

/// Render with default options: plain text, standard column limits.
///
/// `max_count <= 0` renders every entry given.
pub fn render(entries: &[HistoryEntry], max_count: i64) -> String {
    render_with(entries, max_count, &RenderOptions::default())
}

pub fn render_with(entries: &[HistoryEntry], max_count: i64, options: &RenderOptions) -> String {
    let limit = usize::try_from(max_count)
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(entries.len());

    entries
        .iter()
        .take(limit)
        .map(|entry| render_line(entry, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// marker, id, [decorations], time, author, subject; absent fields are omitted.
pub fn render_line(entry: &HistoryEntry, options: &RenderOptions) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(6);

    let marker = if entry.marker.is_empty() {
        "*"
    } else {
        entry.marker.as_str()
    };
    fields.push(marker.to_string());
    fields.push(paint(&entry.short_id, options, |s| s.yellow().to_string()));

    if !entry.decorations.is_empty() {
        let names = entry
            .decorations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        fields.push(paint(&format!("[{names}]"), options, |s| {
            s.red().bold().to_string()
        }));
    }

    if let Some(time) = non_blank(entry.relative_time.as_deref()) {
        fields.push(paint(time, options, |s| s.blue().to_string()));
    }

    if let Some(author) = non_blank(entry.author.as_deref()) {
        let author = truncate(author, options.author_width);
        fields.push(paint(&author, options, |s| s.green().to_string()));
    }

    if !entry.subject.trim().is_empty() {
        fields.push(truncate(entry.subject.trim(), options.subject_width));
    }

    fields.join(" ")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn paint(text: &str, options: &RenderOptions, style: impl Fn(&str) -> String) -> String {
    if options.color {
        style(text)
    } else {
        text.to_string()
    }
}

/// Cut to `width` characters, ending in `...` when anything was dropped.
/// A zero width disables truncation; widths too narrow for the ellipsis
/// cut without one.
fn truncate(text: &str, width: usize) -> String {
    if width == 0 || text.chars().count() <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let keep = width - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Decoration;

    fn sample_entries(n: usize) -> Vec<HistoryEntry> {
        (0..n)
            .map(|i| {
                HistoryEntry::new(format!("c{i:06}"), format!("commit number {i}"))
                    .with_time(format!("{} hours ago", i + 1))
                    .with_author("Alice")
            })
            .collect()
    }

    #[test]
    fn test_full_line_layout() {
        let entry = HistoryEntry::new("a1b2c3d", "feat(auth): add login")
            .with_decorations(vec![
                Decoration::Head,
                Decoration::Local("main".into()),
                Decoration::Remote("origin/main".into()),
                Decoration::Tag("v1.0".into()),
            ])
            .with_time("2 hours ago")
            .with_author("Alice");

        assert_eq!(
            render(&[entry], 0),
            "* a1b2c3d [HEAD, main, origin/main, tag: v1.0] 2 hours ago Alice feat(auth): add login"
        );
    }

    #[test]
    fn test_no_empty_brackets() {
        let entry = HistoryEntry::new("a1b2c3d", "chore: init")
            .with_time("1 day ago")
            .with_author("Bob");
        let line = render(&[entry], 0);
        assert_eq!(line, "* a1b2c3d 1 day ago Bob chore: init");
        assert!(!line.contains("[]"));
    }

    #[test]
    fn test_missing_optional_fields_are_omitted() {
        let entry = HistoryEntry::new("a1b2c3d", "subject").with_marker("| *");
        assert_eq!(render(&[entry], 0), "| * a1b2c3d subject");

        let blank_author = HistoryEntry {
            author: Some("  ".into()),
            ..HistoryEntry::new("a1b2c3d", "subject")
        };
        assert_eq!(render(&[blank_author], 0), "* a1b2c3d subject");
    }

    #[test]
    fn test_max_count_truncates_in_given_order() {
        let output = render(&sample_entries(5), 3);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("c000000"));
        assert!(lines[2].contains("c000002"));
    }

    #[test]
    fn test_non_positive_max_count_is_unlimited() {
        assert_eq!(render(&sample_entries(5), 0).lines().count(), 5);
        assert_eq!(render(&sample_entries(5), -1).lines().count(), 5);
        assert_eq!(render(&sample_entries(2), 10).lines().count(), 2);
        assert_eq!(render(&[], 3), "");
    }

    #[test]
    fn test_render_is_idempotent() {
        let entries = sample_entries(4);
        assert_eq!(render(&entries, 0), render(&entries, 0));
    }

    #[test]
    fn test_truncates_long_author_and_subject() {
        let entry = HistoryEntry::new("abc1234", "s".repeat(100))
            .with_author("A Very Long Author Name Indeed");
        let options = RenderOptions {
            author_width: 10,
            subject_width: 20,
            color: false,
        };
        let line = render_line(&entry, &options);
        assert_eq!(
            line,
            format!("* abc1234 A Very ... {}...", "s".repeat(17))
        );
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("short", 8), "short");
        assert_eq!(truncate("anything", 0), "anything");
    }

    #[test]
    fn test_narrow_width_never_exceeds_limit() {
        assert_eq!(truncate("Alice", 2), "Al");
        assert_eq!(truncate("Alice", 3), "Ali");
        assert_eq!(truncate("Alice", 4), "A...");

        let options = RenderOptions {
            author_width: 2,
            ..RenderOptions::default()
        };
        let entry = HistoryEntry::new("abc1234", "subject").with_author("Alice");
        let line = render_line(&entry, &options);
        assert!(line.contains(" Al "), "{line}");
        assert!(!line.contains("..."));
    }

    #[test]
    fn test_color_only_when_enabled() {
        colored::control::set_override(true);
        let entry = HistoryEntry::new("abc1234", "subject")
            .with_decorations(vec![Decoration::Head]);
        let colored_line = render_line(
            &entry,
            &RenderOptions {
                color: true,
                ..RenderOptions::default()
            },
        );
        assert!(colored_line.contains("\u{1b}["));
        assert!(!render(&[entry], 0).contains("\u{1b}["));
        colored::control::unset_override();
    }
}
