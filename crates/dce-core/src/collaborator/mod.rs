//! Contracts for the external systems the engine calls out to.
//!
//! Concrete implementations live in `dce-infrastructure` (git, tree-sitter)
//! and `dce-interaction` (LLM).

mod chat;
mod symbols;
mod vcs;

use std::future::Future;
use std::time::Duration;

pub use chat::{ChatChunk, ChatClient, ChatMessage, ChatStream, MessageRole};
pub use symbols::{SymbolExtractor, SymbolMap};
pub use vcs::{DiffMode, VcsClient};

use crate::error::{DceError, Result};

/// Awaits a collaborator call, failing with [`DceError::Timeout`] after `limit`.
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("{} timed out after {:?}", operation, limit);
            Err(DceError::timeout(operation, limit))
        }
    }
}
