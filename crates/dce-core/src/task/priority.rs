use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DceError;

/// Priority derived from a task's notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Short label used in task listings.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// The canonical note stored on a task for this priority.
    pub fn note(&self) -> &'static str {
        match self {
            Priority::High => "High Priority: Critical task requiring immediate attention",
            Priority::Medium => "Medium Priority: Important but not time-critical",
            Priority::Low => "Low Priority: Can be addressed later",
        }
    }

    /// Derives the priority from notes. "high priority" wins over "medium priority"
    /// wherever it appears; anything else is `Low`.
    pub fn from_notes(notes: &[String]) -> Self {
        let lowered: Vec<String> = notes.iter().map(|n| n.to_lowercase()).collect();
        if lowered.iter().any(|n| n.contains("high priority")) {
            Priority::High
        } else if lowered.iter().any(|n| n.contains("medium priority")) {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = DceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "urgent" | "critical" => Ok(Priority::High),
            "medium" | "normal" => Ok(Priority::Medium),
            "low" | "optional" => Ok(Priority::Low),
            other => Err(DceError::invalid_input(format!(
                "Invalid priority level '{other}'"
            ))),
        }
    }
}
