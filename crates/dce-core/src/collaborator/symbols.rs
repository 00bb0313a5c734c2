//! Symbol extraction collaborator contract.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Project-relative path to the function and method names declared in it.
pub type SymbolMap = HashMap<String, Vec<String>>;

/// Builds a whole-project symbol index with a syntax-aware parser.
#[async_trait]
pub trait SymbolExtractor: Send + Sync {
    /// Indexes every supported source file below `root`.
    ///
    /// # Errors
    ///
    /// Fails only when the project as a whole cannot be walked. A single file
    /// that cannot be read or parsed contributes no entry.
    async fn build_project_symbol_map(&self, root: &Path) -> Result<SymbolMap>;
}
