//! Builds the message sequence handed to the LLM.

use std::fmt::Write;

use crate::collaborator::ChatMessage;
use crate::session::SessionSnapshot;

pub const DCE_SYSTEM_PROMPT: &str = "You are a development assistant with Dynamic Context Engine (DCE) activated.\n\
The DCE provides real-time context about the current development tasks and codebase state.\n\
ALWAYS prioritize the DCE context when responding to queries.";

pub const EMPTY_TASKS_MESSAGE: &str =
    "**DCE Task List**: No active tasks. Ask 'What are we working on?' to begin.";

const CONTEXT_HEADER: &str = "**ACTIVE DEVELOPMENT CONTEXT**\n\n";

/// Prepends the DCE instructions and the task summary to `prior`.
///
/// The result is always `[system prompt, task summary, ..prior]`, with `prior`
/// unchanged. A blank `summary` becomes [`EMPTY_TASKS_MESSAGE`].
pub fn augment_context(prior: &[ChatMessage], summary: &str) -> Vec<ChatMessage> {
    let context = if summary.trim().is_empty() {
        EMPTY_TASKS_MESSAGE.to_string()
    } else {
        format!("{CONTEXT_HEADER}{summary}")
    };

    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(ChatMessage::system(DCE_SYSTEM_PROMPT));
    messages.push(ChatMessage::system(context));
    messages.extend_from_slice(prior);
    messages
}

/// Renders active tasks and code snapshots as plain text.
///
/// Returns an empty string when there are no active tasks. Each snapshot is
/// cut to `snapshot_char_limit` characters; snapshots are ordered by path.
pub fn render_context_summary(snapshot: &SessionSnapshot, snapshot_char_limit: usize) -> String {
    if snapshot.tasks.is_empty() {
        return String::new();
    }

    let mut out = String::from("Tasks:\n");
    for (i, task) in snapshot.tasks.iter().enumerate() {
        let _ = writeln!(out, "{}. [{}] {}", i + 1, task.priority(), task.description);
        if !task.files.is_empty() {
            let _ = writeln!(out, "   Files: {}", task.files.join(", "));
        }
        if !task.functions.is_empty() {
            let _ = writeln!(out, "   Functions: {}", task.functions.join(", "));
        }
        if !task.dependencies.is_empty() {
            let _ = writeln!(out, "   Dependencies: {}", task.dependencies.join(", "));
        }
        if !task.notes.is_empty() {
            let _ = writeln!(out, "   Notes: {}", task.notes.join("; "));
        }
    }

    if !snapshot.code_snapshots.is_empty() {
        out.push_str("\nCode snapshots:\n");
        let mut paths: Vec<_> = snapshot.code_snapshots.keys().collect();
        paths.sort();
        for path in paths {
            let content = &snapshot.code_snapshots[path];
            let _ = writeln!(out, "--- {path} ---");
            let truncated: String = content.chars().take(snapshot_char_limit).collect();
            out.push_str(&truncated);
            if truncated.len() < content.len() {
                out.push_str("\n... (truncated)");
            }
            out.push('\n');
        }
    }

    out
}
