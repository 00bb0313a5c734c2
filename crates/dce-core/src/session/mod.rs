//! Per-conversation session state, its background monitor and the registry.

mod model;
mod monitor;
mod registry;

pub use model::{DceSession, SessionSnapshot};
pub use registry::SessionRegistry;
