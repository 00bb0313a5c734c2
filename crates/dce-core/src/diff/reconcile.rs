//! Task state machine driven by diff events.
//!
//! The caller holds the session write lock and passes the active and completed
//! task lists by mutable reference. Applying the same batch twice leaves the
//! lists unchanged the second time, so repeated polls of an unchanged working
//! tree are stable. A `New function` task is never annotated by the
//! declaration that created it.

use std::collections::HashSet;

use super::event::{ChangeEvent, ChangeKind};
use crate::task::Task;

pub const NEW_FILE_NOTE: &str = "Consider adding tests and documentation";
pub const NEW_FUNCTION_NOTES: [&str; 2] = ["Write unit tests", "Add documentation"];

/// Counts of the transitions applied by one [`reconcile`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub created: usize,
    pub completed: usize,
    pub annotated: usize,
}

impl ReconcileOutcome {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.completed == 0 && self.annotated == 0
    }
}

/// Applies `events` in order to the active and completed task lists.
///
/// - `NewFile`: adds a `New file: <path>` task unless an active task already
///   lists the file.
/// - `AddedLine` declaring a function: annotates every other active task that
///   references the function (dependency plus note), or adds a
///   `New function: <name>` task when none does.
/// - `RemovedLine` declaring a function: completes every active task that
///   references it, unless the same file re-declares it in this batch.
/// - `Deleted`: completes every active task referencing the file.
///
/// Everything else is a no-op.
pub fn reconcile(
    events: &[ChangeEvent],
    tasks: &mut Vec<Task>,
    completed: &mut Vec<Task>,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    let redeclared: HashSet<(&str, &str)> = events
        .iter()
        .filter(|e| e.kind == ChangeKind::AddedLine)
        .filter_map(|e| e.function_name.as_deref().map(|f| (e.file.as_str(), f)))
        .collect();

    for event in events {
        match (event.kind, event.function_name.as_deref()) {
            (ChangeKind::NewFile, _) => {
                if tasks.iter().any(|t| t.references_file(&event.file)) {
                    continue;
                }
                tasks.push(
                    Task::new(format!("New file: {}", event.file))
                        .with_files(vec![event.file.clone()])
                        .with_notes(vec![NEW_FILE_NOTE.to_string()]),
                );
                outcome.created += 1;
            }
            (ChangeKind::AddedLine, Some(function)) => {
                let mut referenced = false;
                for task in tasks.iter_mut().filter(|t| t.references_function(function)) {
                    referenced = true;
                    if is_declaration_task(task, &event.file, function) {
                        continue;
                    }
                    let dep = task.add_dependency(function);
                    let note = task.add_note_once(format!("Function {function} changed in diff."));
                    if dep || note {
                        outcome.annotated += 1;
                    }
                }
                if !referenced {
                    tasks.push(
                        Task::new(new_function_description(function))
                            .with_files(vec![event.file.clone()])
                            .with_functions(vec![function.to_string()])
                            .with_notes(NEW_FUNCTION_NOTES.iter().map(|n| n.to_string()).collect()),
                    );
                    outcome.created += 1;
                }
            }
            (ChangeKind::RemovedLine, Some(function)) => {
                if redeclared.contains(&(event.file.as_str(), function)) {
                    tracing::debug!(
                        "Function {} re-declared in {}; treating as modification",
                        function,
                        event.file
                    );
                    continue;
                }
                outcome.completed +=
                    move_to_completed(tasks, completed, |t| t.references_function(function));
            }
            (ChangeKind::Deleted, _) => {
                outcome.completed +=
                    move_to_completed(tasks, completed, |t| t.references_file(&event.file));
            }
            _ => {}
        }
    }

    outcome
}

fn new_function_description(function: &str) -> String {
    format!("New function: {function}")
}

/// Whether `task` is the one created for `function` declared in `file`.
fn is_declaration_task(task: &Task, file: &str, function: &str) -> bool {
    task.description == new_function_description(function) && task.references_file(file)
}

/// Moves every task matching `pred` from `tasks` to `completed`, keeping order.
fn move_to_completed<F>(tasks: &mut Vec<Task>, completed: &mut Vec<Task>, pred: F) -> usize
where
    F: Fn(&Task) -> bool,
{
    let (done, remaining): (Vec<Task>, Vec<Task>) = tasks.drain(..).partition(|t| pred(t));
    *tasks = remaining;
    let moved = done.len();
    completed.extend(done);
    moved
}
