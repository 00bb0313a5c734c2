//! Slash-command language: grammar, alias table and command reference.
//!
//! Parsing is pure. Dispatch against a session lives in `dce-application`.

mod builtin;
mod parser;

pub use builtin::{BuiltinCommand, builtin_commands, completion_candidates};
pub use parser::{Command, CommandOptions, ParsedCommand, is_verbose_flag, parse_command};
