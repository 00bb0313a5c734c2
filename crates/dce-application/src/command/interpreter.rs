//! Dispatches parsed slash commands against a session.

use std::sync::Arc;

use dce_core::command::{
    Command, ParsedCommand, builtin_commands, is_verbose_flag, parse_command,
};
use dce_core::error::DceError;
use dce_core::session::DceSession;
use dce_core::task::{Priority, Task};

use super::output::CommandOutput;
use crate::task_builder::TaskBuilder;

/// Interprets the DCE command language.
///
/// Every handler copies what it needs from the session and renders after the
/// lock is released. User mistakes become error lines; nothing is propagated.
pub struct CommandInterpreter {
    builder: Arc<TaskBuilder>,
}

impl CommandInterpreter {
    pub fn new(builder: Arc<TaskBuilder>) -> Self {
        Self { builder }
    }

    /// Handles `input` if it is a slash command.
    ///
    /// Returns `None` for anything else so the caller can forward it to the LLM.
    pub async fn handle(&self, input: &str, session: &Arc<DceSession>) -> Option<CommandOutput> {
        let parsed = parse_command(input)?;
        tracing::debug!(
            "[{}] command {} args={:?}",
            session.conversation_id(),
            parsed.command,
            parsed.args
        );
        Some(self.dispatch(&parsed, session).await)
    }

    async fn dispatch(&self, parsed: &ParsedCommand, session: &Arc<DceSession>) -> CommandOutput {
        match parsed.command {
            Command::Tasks => self.tasks(session, parsed.options.verbose).await,
            Command::Add => self.add(session, &parsed.args).await,
            Command::Dce => self.dce(session, &parsed.args).await,
            Command::Priority => self.priority(session, &parsed.args).await,
            Command::Complete => self.complete(session, &parsed.args).await,
            Command::Refresh => self.refresh(session).await,
            Command::Status => self.status(session).await,
            Command::Help => help(),
            Command::Unknown => {
                let mut out = CommandOutput::new();
                out.warning(format!(
                    "[!] Unrecognized command: {:?}",
                    format!("/{}", parsed.token)
                ));
                out.extend(help());
                out
            }
        }
    }

    async fn tasks(&self, session: &DceSession, verbose: bool) -> CommandOutput {
        let tasks = session.tasks().await;
        let mut out = CommandOutput::new();
        out.heading("[Task List] Current Tasks:");
        render_task_list(&mut out, &tasks, verbose);
        out
    }

    async fn add(&self, session: &DceSession, args: &str) -> CommandOutput {
        let mut out = CommandOutput::new();
        if args.is_empty() {
            out.error("[X] Please provide a task description after /add");
            return out;
        }

        let built = match self.builder.build_task_list(args).await {
            Ok(built) => built,
            Err(e) => {
                out.error(format!("[X] Failed to build tasks: {e}"));
                return out;
            }
        };

        for line in &built.log_lines {
            out.plain(format!("  {line}"));
        }
        let added = built.tasks.len();
        let descriptions: Vec<String> =
            built.tasks.iter().map(|t| t.description.clone()).collect();

        session.append_tasks(built.tasks).await;
        session.merge_snapshots(built.snapshots).await;

        out.success(format!("[Add] Successfully added {added} task(s)"));
        for description in descriptions {
            out.plain(format!("  + {description}"));
        }
        out
    }

    async fn dce(&self, session: &Arc<DceSession>, args: &str) -> CommandOutput {
        let sub = args
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let mut out = CommandOutput::new();

        match sub.as_str() {
            "on" | "activate" | "start" => {
                if session.start_monitoring().await {
                    out.success("[DCE] Dynamic Context Engine activated");
                } else {
                    out.warning("[DCE] DCE is already active");
                }
            }
            "off" | "deactivate" | "stop" => {
                if session.stop_monitoring().await {
                    out.success("[DCE] Dynamic Context Engine deactivated");
                } else {
                    out.warning("[DCE] DCE is already inactive");
                }
            }
            "status" | "info" => return self.status(session).await,
            "" => {
                out.warning("[!] Usage: /dce on|off|status");
            }
            other => {
                out.error(format!(
                    "[X] Unknown DCE command: {other}. Use on, off, or status"
                ));
            }
        }
        out
    }

    async fn priority(&self, session: &DceSession, args: &str) -> CommandOutput {
        let mut out = CommandOutput::new();
        let parts = operands(args);

        if parts.is_empty() {
            let tasks = session.tasks().await;
            out.heading("[Priority] Task Priorities:");
            if tasks.is_empty() {
                out.warning("  [!] No active tasks");
            }
            for (i, task) in tasks.iter().enumerate() {
                out.plain(format!("  {}) [{}] {}", i + 1, task.priority(), task.description));
            }
            return out;
        }

        let [number, level] = parts.as_slice() else {
            out.error("[X] Usage: /priority <task-number> <low|medium|high>");
            return out;
        };
        let Some(number) = parse_task_number(number) else {
            out.error(format!("[X] Invalid task number: {number}"));
            return out;
        };
        let priority: Priority = match level.parse() {
            Ok(priority) => priority,
            Err(_) => {
                out.error(format!(
                    "[X] Invalid priority level: {level}. Use low, medium, or high"
                ));
                return out;
            }
        };

        match session.set_priority(number, priority).await {
            Ok(task) => {
                out.success(format!(
                    "[Priority] Task {number} set to {priority} priority: {}",
                    task.description
                ));
            }
            Err(e) => {
                out.error(index_error_message(&e));
            }
        }
        out
    }

    async fn complete(&self, session: &DceSession, args: &str) -> CommandOutput {
        let mut out = CommandOutput::new();
        let Some(arg) = operands(args).first().copied() else {
            out.error("[X] Usage: /complete <task-number>");
            return out;
        };
        let Some(number) = parse_task_number(arg) else {
            out.error(format!("[X] Invalid task number: {arg}"));
            return out;
        };

        match session.complete_task(number).await {
            Ok((task, remaining)) => {
                out.success(format!(
                    "[Complete] Task {number} marked as completed: {}",
                    task.description
                ));
                if remaining.is_empty() {
                    out.plain("[Complete] No remaining tasks.");
                } else {
                    out.heading("Remaining tasks:");
                    render_task_list(&mut out, &remaining, false);
                }
            }
            Err(e) => {
                out.error(index_error_message(&e));
            }
        }
        out
    }

    async fn refresh(&self, session: &DceSession) -> CommandOutput {
        let mut out = CommandOutput::new();
        out.plain("[Refresh] Refreshing task list from git changes...");
        match session.refresh().await {
            Ok(outcome) => {
                out.success("[Refresh] Task list updated with latest changes");
                if !outcome.is_empty() {
                    out.plain(format!(
                        "  {} created, {} completed, {} annotated",
                        outcome.created, outcome.completed, outcome.annotated
                    ));
                }
            }
            Err(e) => {
                out.error(format!("[X] Failed to refresh task list: {e}"));
            }
        }
        out
    }

    async fn status(&self, session: &DceSession) -> CommandOutput {
        let snapshot = session.snapshot().await;
        let mut out = CommandOutput::new();
        out.heading("[DCE Status] Engine Status:");
        out.plain(format!(
            "  Status: {}",
            if snapshot.monitor_active {
                "ACTIVE"
            } else {
                "INACTIVE"
            }
        ));
        out.plain(format!("  Active Tasks: {}", snapshot.tasks.len()));
        out.plain(format!("  Completed Tasks: {}", snapshot.completed.len()));
        out.plain(format!("  Monitoring Interval: {:?}", snapshot.poll_interval));
        out.plain("  Features:");
        out.plain("    - Real-time git diff monitoring");
        out.plain("    - Syntax-aware function extraction");
        out.plain("    - Task priority management");
        out
    }
}

fn help() -> CommandOutput {
    let mut out = CommandOutput::new();
    out.heading("[Commands] Available DCE Commands:");
    for command in builtin_commands() {
        out.plain(format!("  {}", command.help_line()));
    }
    out
}

fn render_task_list(out: &mut CommandOutput, tasks: &[Task], verbose: bool) {
    if tasks.is_empty() {
        out.warning("  [!] No active tasks");
        return;
    }
    for (i, task) in tasks.iter().enumerate() {
        out.plain(format!("  {}) {}", i + 1, task.description));
        if !verbose {
            continue;
        }
        if !task.files.is_empty() {
            out.plain(format!("     Files: {}", task.files.join(", ")));
        }
        if !task.functions.is_empty() {
            out.plain(format!("     Functions: {}", task.functions.join(", ")));
        }
        if !task.dependencies.is_empty() {
            out.plain(format!("     Dependencies: {}", task.dependencies.join(", ")));
        }
        if !task.notes.is_empty() {
            out.plain(format!("     Notes: {}", task.notes.join("; ")));
        }
    }
}

/// Positive 1-based task number.
/// Argument words with verbose flags removed.
fn operands(args: &str) -> Vec<&str> {
    args.split_whitespace().filter(|w| !is_verbose_flag(w)).collect()
}

fn parse_task_number(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|n| *n > 0)
}

fn index_error_message(err: &DceError) -> String {
    match err {
        DceError::TaskIndexOutOfRange { len: 0, .. } => {
            "[X] Task number out of range (no active tasks)".to_string()
        }
        DceError::TaskIndexOutOfRange { len, .. } => {
            format!("[X] Task number out of range (1-{len})")
        }
        other => format!("[X] {other}"),
    }
}
