//! Task domain module.
//!
//! - `model`: the `Task` record shared by the builder, the reconciler and the
//!   command interpreter
//! - `priority`: priority levels, their synonyms and canonical notes

mod model;
mod priority;

pub use model::Task;
pub use priority::Priority;
