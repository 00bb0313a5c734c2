//! Static reference for the DCE command language.

use std::sync::OnceLock;

use super::parser::Command;

/// A command entry in the help reference.
#[derive(Debug, Clone)]
pub struct BuiltinCommand {
    pub command: Command,
    /// Usage format (e.g., "/complete <task-number>")
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl BuiltinCommand {
    pub const fn new(
        command: Command,
        usage: &'static str,
        aliases: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            command,
            usage,
            aliases,
            description,
        }
    }

    /// One help line, e.g. `/tasks (/t, /task) - List active tasks`.
    pub fn help_line(&self) -> String {
        if self.aliases.is_empty() {
            format!("{} - {}", self.usage, self.description)
        } else {
            let aliases: Vec<String> = self.aliases.iter().map(|a| format!("/{a}")).collect();
            format!("{} ({}) - {}", self.usage, aliases.join(", "), self.description)
        }
    }
}

static BUILTIN_COMMANDS: OnceLock<Vec<BuiltinCommand>> = OnceLock::new();

/// Returns the command reference, in display order.
pub fn builtin_commands() -> &'static [BuiltinCommand] {
    BUILTIN_COMMANDS.get_or_init(|| {
        vec![
            BuiltinCommand::new(
                Command::Tasks,
                "/tasks [-v]",
                &["t", "task"],
                "List active tasks (-v shows files, functions and notes)",
            ),
            BuiltinCommand::new(
                Command::Add,
                "/add <description>",
                &["a"],
                "Build tasks from a description and add them",
            ),
            BuiltinCommand::new(
                Command::Dce,
                "/dce on|off|status",
                &["d"],
                "Activate, deactivate or inspect the engine",
            ),
            BuiltinCommand::new(
                Command::Priority,
                "/priority [<task-number> <low|medium|high>]",
                &["p", "prio"],
                "Show task priorities or set one",
            ),
            BuiltinCommand::new(
                Command::Complete,
                "/complete <task-number>",
                &["comp"],
                "Mark a task as completed",
            ),
            BuiltinCommand::new(
                Command::Refresh,
                "/refresh",
                &["r"],
                "Update the task list from current git changes",
            ),
            BuiltinCommand::new(
                Command::Status,
                "/status",
                &["s"],
                "Show engine status",
            ),
            BuiltinCommand::new(
                Command::Help,
                "/help",
                &["c", "cmds", "commands"],
                "Show this command reference",
            ),
        ]
    })
}

/// Slash forms offered for completion in interactive front ends.
pub fn completion_candidates() -> Vec<String> {
    let mut candidates: Vec<String> = builtin_commands()
        .iter()
        .map(|c| format!("/{}", c.command.name()))
        .collect();
    candidates.extend(["/exit".to_string(), "/quit".to_string()]);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_alias_resolves_to_its_command() {
        for entry in builtin_commands() {
            assert_eq!(Command::from_alias(entry.command.name()), entry.command);
            for alias in entry.aliases {
                assert_eq!(Command::from_alias(alias), entry.command, "/{alias}");
            }
        }
    }

    #[test]
    fn test_help_line_format() {
        let line = builtin_commands()[0].help_line();
        assert!(line.starts_with("/tasks [-v] (/t, /task) - "));
    }

    #[test]
    fn test_reference_excludes_unknown() {
        assert!(
            builtin_commands()
                .iter()
                .all(|c| c.command != Command::Unknown)
        );
    }
}
