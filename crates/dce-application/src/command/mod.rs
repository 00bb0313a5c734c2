//! Command interpreter and its rendered output.

mod interpreter;
mod output;

pub use interpreter::CommandInterpreter;
pub use output::{CommandOutput, OutputLine, Tone};
