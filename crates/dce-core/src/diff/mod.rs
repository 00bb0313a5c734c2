//! Diff ingestion: parsing unified diffs into change events and reconciling
//! those events against a session's task lists.

mod event;
mod parser;
mod reconcile;

pub use event::{ChangeEvent, ChangeKind};
pub use parser::{extract_function_name, parse_diff};
pub use reconcile::{NEW_FILE_NOTE, NEW_FUNCTION_NOTES, ReconcileOutcome, reconcile};
