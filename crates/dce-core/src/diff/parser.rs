//! Unified-diff parser.
//!
//! Turns raw `git diff` output into an ordered list of [`ChangeEvent`]s.
//! The parser is pure: it never fails, and lines it cannot place are skipped.

use std::sync::LazyLock;

use regex::Regex;

use super::event::ChangeEvent;
use crate::path::normalize_path;

const DEV_NULL: &str = "/dev/null";

/// Matches function declarations in Go, Rust, Python, JavaScript and C-like
/// sources, including Go method receivers and generic parameter lists.
static FUNCTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(?:pub(?:\([^)]*\))?\s+)?",
        r"(?:(?:async|const|unsafe|extern|static|export|public|private|protected)\s+)*",
        r"(?:func|fn|def|function)\s+",
        r"(?:\([^)]*\)\s*)?",
        r"([A-Za-z_][A-Za-z0-9_]*)\s*[<(\[]",
    ))
    .expect("Invalid regex pattern for function declarations")
});

/// Returns the declared function name if `line` looks like a declaration.
pub fn extract_function_name(line: &str) -> Option<String> {
    FUNCTION_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Per-file header state. Reset at every `diff --git` line.
#[derive(Default)]
struct FileSection {
    file: Option<String>,
    in_hunk: bool,
    announced_new: bool,
    announced_deleted: bool,
}

impl FileSection {
    fn announce_new(&mut self, events: &mut Vec<ChangeEvent>) {
        if let Some(file) = &self.file {
            if !self.announced_new {
                events.push(ChangeEvent::new_file(file.clone()));
                self.announced_new = true;
            }
        }
    }

    fn announce_deleted(&mut self, events: &mut Vec<ChangeEvent>) {
        if let Some(file) = &self.file {
            if !self.announced_deleted {
                events.push(ChangeEvent::deleted(file.clone()));
                self.announced_deleted = true;
            }
        }
    }
}

/// Parses unified-diff text into change events, in input order.
///
/// Both `diff --git a/<p> b/<p>` and `+++ b/<p>` establish the current file.
/// `new file mode` / `--- /dev/null` yield a `NewFile` event and
/// `deleted file mode` / `+++ /dev/null` yield a `Deleted` event. Content
/// lines before any file header are ignored.
///
/// # Examples
///
/// ```
/// use dce_core::diff::{parse_diff, ChangeKind};
///
/// let events = parse_diff("+++ b/foo.go\n+func Handle(w http.ResponseWriter) {\n");
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].kind, ChangeKind::AddedLine);
/// assert_eq!(events[0].function_name.as_deref(), Some("Handle"));
/// ```
pub fn parse_diff(diff: &str) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    let mut section = FileSection::default();

    for line in diff.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            section = FileSection {
                file: parse_git_header(rest),
                ..FileSection::default()
            };
            if section.file.is_none() {
                tracing::debug!("Skipping unparseable diff header: {:?}", line);
            }
            continue;
        }

        if line.starts_with("@@") {
            section.in_hunk = section.file.is_some();
            continue;
        }

        if !section.in_hunk {
            if line.starts_with("new file mode") {
                section.announce_new(&mut events);
                continue;
            }
            if line.starts_with("deleted file mode") {
                section.announce_deleted(&mut events);
                continue;
            }
            if let Some(rest) = line.strip_prefix("--- ") {
                if header_path(rest) == DEV_NULL {
                    section.announce_new(&mut events);
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix("+++ ") {
                let path = header_path(rest);
                if path == DEV_NULL {
                    section.announce_deleted(&mut events);
                } else {
                    let path = normalize_path(path.strip_prefix("b/").unwrap_or(path));
                    if !path.is_empty() {
                        section.file = Some(path);
                    }
                }
                continue;
            }
        }

        let Some(file) = section.file.as_deref() else {
            if !line.is_empty() {
                tracing::debug!("Ignoring diff line outside any file: {:?}", line);
            }
            continue;
        };

        if let Some(content) = line.strip_prefix('+') {
            events.push(ChangeEvent::added_line(
                file,
                content,
                extract_function_name(content),
            ));
        } else if let Some(content) = line.strip_prefix('-') {
            events.push(ChangeEvent::removed_line(
                file,
                content,
                extract_function_name(content),
            ));
        }
    }

    events
}

/// Extracts the `b/` path from the remainder of a `diff --git` line.
fn parse_git_header(rest: &str) -> Option<String> {
    let idx = rest.rfind(" b/")?;
    let path = normalize_path(&rest[idx + 3..]);
    (!path.is_empty()).then_some(path)
}

/// Drops an optional tab-separated timestamp from a `---`/`+++` header path.
fn header_path(rest: &str) -> &str {
    rest.split('\t').next().unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;

    #[test]
    fn test_empty_diff_yields_no_events() {
        assert!(parse_diff("").is_empty());
        assert!(parse_diff("\n\n").is_empty());
    }

    #[test]
    fn test_plus_header_then_function_line() {
        let events = parse_diff("+++ b/foo.go\n+func Serve(addr string) error {\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].file, "foo.go");
        assert_eq!(events[0].kind, ChangeKind::AddedLine);
        assert_eq!(events[0].function_name.as_deref(), Some("Serve"));
        assert_eq!(events[0].content, "func Serve(addr string) error {");
    }

    #[test]
    fn test_full_git_diff_with_hunks() {
        let diff = "\
diff --git a/cmd/root.go b/cmd/root.go
index 3b18e51..a9c2f3e 100644
--- a/cmd/root.go
+++ b/cmd/root.go
@@ -10,3 +10,4 @@ import (
 context line
-func oldName() {
+func (s *Server) newName(ctx context.Context) {
+	return
";
        let events = parse_diff(diff);

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, ChangeKind::RemovedLine);
        assert_eq!(events[0].function_name.as_deref(), Some("oldName"));
        assert_eq!(events[1].kind, ChangeKind::AddedLine);
        assert_eq!(events[1].function_name.as_deref(), Some("newName"));
        assert_eq!(events[2].function_name, None);
        assert!(events.iter().all(|e| e.file == "cmd/root.go"));
    }

    #[test]
    fn test_new_and_deleted_file_headers() {
        let diff = "\
diff --git a/new.rs b/new.rs
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/new.rs
@@ -0,0 +1 @@
+pub async fn start() {}
diff --git a/old.rs b/old.rs
deleted file mode 100644
--- a/old.rs
+++ /dev/null
@@ -1 +0,0 @@
-fn legacy() {}
";
        let events = parse_diff(diff);
        let kinds: Vec<_> = events.iter().map(|e| (e.file.as_str(), e.kind)).collect();

        assert_eq!(
            kinds,
            vec![
                ("new.rs", ChangeKind::NewFile),
                ("new.rs", ChangeKind::AddedLine),
                ("old.rs", ChangeKind::Deleted),
                ("old.rs", ChangeKind::RemovedLine),
            ]
        );
        assert_eq!(events[1].function_name.as_deref(), Some("start"));
        assert_eq!(events[3].function_name.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_lines_before_header_are_ignored() {
        let events = parse_diff("+func Orphan() {\n-func Other() {\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_content_line_resembling_header_inside_hunk() {
        let diff = "\
diff --git a/notes.md b/notes.md
--- a/notes.md
+++ b/notes.md
@@ -1 +1 @@
--- old rule
+++ new rule
";
        let events = parse_diff(diff);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].content, "-- old rule");
        assert_eq!(events[1].content, "++ new rule");
    }

    #[test]
    fn test_extract_function_name_variants() {
        assert_eq!(extract_function_name("func main() {").as_deref(), Some("main"));
        assert_eq!(
            extract_function_name("func Map[T any](xs []T) []T {").as_deref(),
            Some("Map")
        );
        assert_eq!(
            extract_function_name("    pub(crate) fn parse<'a>(s: &'a str) {").as_deref(),
            Some("parse")
        );
        assert_eq!(extract_function_name("def handler(event):").as_deref(), Some("handler"));
        assert_eq!(extract_function_name("let x = funcCall();"), None);
        assert_eq!(extract_function_name("// fn commented"), None);
    }
}
