//! Core domain of the Dynamic Context Engine.
//!
//! Holds the task model, the diff parser and reconciler, the session with its
//! background monitor, the registry, the command grammar and the context
//! augmenter. External systems are reached only through the traits in
//! [`collaborator`].

pub mod augment;
pub mod collaborator;
pub mod command;
pub mod config;
pub mod diff;
pub mod error;
pub mod path;
pub mod session;
pub mod task;

// Re-export common types
pub use error::{DceError, Result};
pub use session::{DceSession, SessionRegistry, SessionSnapshot};
pub use task::{Priority, Task};
