//! Tolerant slash-command grammar.

use std::fmt;

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];
const VERBOSE_FLAGS: &[&str] = &["-v", "v", "verbose"];

/// Canonical command names after alias resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Tasks,
    Add,
    Help,
    Dce,
    Priority,
    Complete,
    Refresh,
    Status,
    Unknown,
}

impl Command {
    /// Resolves a lowercased token (without `/`) through the alias table.
    pub fn from_alias(token: &str) -> Self {
        match token {
            "t" | "task" | "tasks" | "taks" => Command::Tasks,
            "a" | "add" => Command::Add,
            "c" | "cmd" | "cmds" | "command" | "commands" | "help" | "h" => Command::Help,
            "d" | "dce" => Command::Dce,
            "p" | "prio" | "priority" => Command::Priority,
            "comp" | "complete" => Command::Complete,
            "r" | "refresh" => Command::Refresh,
            "s" | "status" => Command::Status,
            _ => Command::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Tasks => "tasks",
            Command::Add => "add",
            Command::Help => "help",
            Command::Dce => "dce",
            Command::Priority => "priority",
            Command::Complete => "complete",
            Command::Refresh => "refresh",
            Command::Status => "status",
            Command::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandOptions {
    pub verbose: bool,
}

/// Result of parsing one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: Command,
    /// The command token as typed, lowercased and without `/` or trailing punctuation.
    pub token: String,
    /// Text after the command token, trimmed at both ends only.
    pub args: String,
    pub options: CommandOptions,
}

/// Parses `input` if it is a slash command.
///
/// Returns `None` unless the trimmed input starts with `/`. Unknown command
/// tokens resolve to [`Command::Unknown`] rather than failing.
///
/// # Examples
///
/// ```
/// use dce_core::command::{parse_command, Command};
///
/// let parsed = parse_command("  /Taks!  -v").unwrap();
/// assert_eq!(parsed.command, Command::Tasks);
/// assert!(parsed.options.verbose);
/// assert!(parse_command("what are we doing?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix('/')?;

    let (raw_token, rest) = match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, ""),
    };

    let token = raw_token
        .to_lowercase()
        .trim_end_matches(TRAILING_PUNCTUATION)
        .to_string();
    let args = rest.trim().to_string();
    let verbose = args.split_whitespace().any(is_verbose_flag);

    Some(ParsedCommand {
        command: Command::from_alias(&token),
        token,
        args,
        options: CommandOptions { verbose },
    })
}

/// Whether `word` is one of the verbose flags accepted after any command.
pub fn is_verbose_flag(word: &str) -> bool {
    VERBOSE_FLAGS.contains(&word.to_lowercase().as_str())
}
