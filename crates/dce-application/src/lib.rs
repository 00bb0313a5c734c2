//! Application layer: task building, command interpretation and the
//! session-level service used by front ends.

pub mod command;
pub mod service;
pub mod task_builder;

pub use command::{CommandInterpreter, CommandOutput, OutputLine, Tone};
pub use service::{Activation, DceService};
pub use task_builder::{TaskBuildResult, TaskBuilder};
