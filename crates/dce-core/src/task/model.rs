use serde::{Deserialize, Serialize};

use super::priority::Priority;
use crate::path::same_path;

/// A unit of tracked development work.
///
/// `description` is fixed at creation. The list fields keep insertion order
/// because they are rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub files: Vec<String>,
    pub functions: Vec<String>,
    pub dependencies: Vec<String>,
    pub notes: Vec<String>,
}

impl Task {
    /// Creates a task with only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    pub fn with_functions(mut self, functions: Vec<String>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether any of the task's files refers to `path`.
    pub fn references_file(&self, path: &str) -> bool {
        self.files.iter().any(|f| same_path(f, path))
    }

    /// Whether the task lists `name` as one of its functions.
    pub fn references_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }

    /// Appends a dependency unless already present. Returns `true` if appended.
    pub fn add_dependency(&mut self, name: &str) -> bool {
        if self.dependencies.iter().any(|d| d == name) {
            return false;
        }
        self.dependencies.push(name.to_string());
        true
    }

    /// Appends a note unless an identical one exists. Returns `true` if appended.
    pub fn add_note_once(&mut self, note: impl Into<String>) -> bool {
        let note = note.into();
        if self.notes.contains(&note) {
            return false;
        }
        self.notes.push(note);
        true
    }

    pub fn priority(&self) -> Priority {
        Priority::from_notes(&self.notes)
    }

    /// Replaces every priority-bearing note with the canonical one for `priority`.
    pub fn set_priority(&mut self, priority: Priority) {
        self.notes
            .retain(|note| !note.to_lowercase().contains("priority"));
        self.notes.push(priority.note().to_string());
    }
}
