//! Version-control collaborator contract.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// How much context the diff should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffMode {
    /// `--unified=0`: changed lines only. Used by the background monitor.
    #[default]
    Unified0,
    /// Default git context lines.
    Full,
}

/// Read-only queries against the working tree.
///
/// Implementations run external processes; callers must never hold a session
/// lock while awaiting these methods.
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Root directory of the repository. Tracked paths are relative to it.
    fn repo_root(&self) -> &Path;

    /// Lists every version-controlled file, relative to [`Self::repo_root`].
    async fn list_tracked_files(&self) -> Result<Vec<String>>;

    /// Returns the raw unified diff of the working tree against the index.
    async fn diff_since_last_poll(&self, mode: DiffMode) -> Result<String>;

    /// Lists files that are neither tracked nor ignored.
    async fn list_untracked_files(&self) -> Result<Vec<String>>;
}
