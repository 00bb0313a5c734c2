//! Builds an initial task list from free text and the project tree.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dce_core::collaborator::{SymbolExtractor, SymbolMap, VcsClient, with_timeout};
use dce_core::error::Result;
use dce_core::path::{normalize_path, paths_match, strip_repo_prefix};
use dce_core::task::Task;

pub const CATCH_ALL_NOTE: &str = "No direct file matches found. Add manually.";
pub const CONSOLIDATED_NOTE: &str = "Matched via input and file heuristics.";

const MIN_TOKEN_CHARS: usize = 3;

/// Output of [`TaskBuilder::build_task_list`].
#[derive(Debug, Clone, Default)]
pub struct TaskBuildResult {
    pub tasks: Vec<Task>,
    /// Matched file path to full content.
    pub snapshots: HashMap<String, String>,
    /// Human-readable trace of what the builder did.
    pub log_lines: Vec<String>,
}

impl TaskBuildResult {
    fn log(&mut self, line: String) {
        tracing::info!("{}", line);
        self.log_lines.push(line);
    }
}

/// Keyword-matches tracked files against free text and extracts their functions.
///
/// Holds no session state and takes no locks.
pub struct TaskBuilder {
    vcs: Arc<dyn VcsClient>,
    symbols: Arc<dyn SymbolExtractor>,
    timeout: Duration,
}

impl TaskBuilder {
    pub fn new(
        vcs: Arc<dyn VcsClient>,
        symbols: Arc<dyn SymbolExtractor>,
        timeout: Duration,
    ) -> Self {
        Self {
            vcs,
            symbols,
            timeout,
        }
    }

    /// Builds tasks for `free_text`.
    ///
    /// With no matching tracked file this yields a single catch-all task and
    /// performs no extraction. Otherwise it yields one task covering every
    /// matched file and its functions, plus a content snapshot per readable file.
    ///
    /// # Errors
    ///
    /// Fails only if the tracked-file listing fails or times out. Symbol
    /// extraction and file reads degrade with a log entry.
    pub async fn build_task_list(&self, free_text: &str) -> Result<TaskBuildResult> {
        let mut result = TaskBuildResult::default();
        result.log(format!("Building task list from input: {free_text:?}"));

        let tracked = with_timeout(
            "git ls-files",
            self.timeout,
            self.vcs.list_tracked_files(),
        )
        .await?;
        result.log(format!("Found {} tracked files", tracked.len()));

        let tokens = tokenize(free_text);
        let matched: Vec<String> = tracked
            .into_iter()
            .filter(|file| {
                let lower = file.to_lowercase();
                tokens.iter().any(|token| lower.contains(token.as_str()))
            })
            .collect();

        if matched.is_empty() {
            result.log("No file matches found - created catch-all task".to_string());
            result
                .tasks
                .push(Task::new(free_text).with_notes(vec![CATCH_ALL_NOTE.to_string()]));
            return Ok(result);
        }
        result.log(format!("Matched {} files: {:?}", matched.len(), matched));

        let root = self.vcs.repo_root().to_path_buf();
        let symbol_map = match with_timeout(
            "symbol extraction",
            self.timeout,
            self.symbols.build_project_symbol_map(&root),
        )
        .await
        {
            Ok(map) => normalize_symbol_map(map, root.file_name().and_then(|n| n.to_str())),
            Err(e) => {
                result.log(format!("Symbol extraction failed, continuing without functions: {e}"));
                SymbolMap::new()
            }
        };

        let mut functions: Vec<String> = Vec::new();
        for file in &matched {
            for name in functions_for(&symbol_map, file) {
                if !functions.contains(name) {
                    functions.push(name.clone());
                }
            }

            match tokio::fs::read_to_string(root.join(file)).await {
                Ok(content) => {
                    result.snapshots.insert(file.clone(), content);
                }
                Err(e) => tracing::debug!("Skipping snapshot of {}: {}", file, e),
            }
        }

        result.log(format!(
            "Created task with {} files and {} functions",
            matched.len(),
            functions.len()
        ));
        result.tasks.push(
            Task::new(free_text)
                .with_files(matched)
                .with_functions(functions)
                .with_notes(vec![CONSOLIDATED_NOTE.to_string()]),
        );
        Ok(result)
    }
}

/// Lowercased whitespace-separated words of at least three characters, with
/// surrounding punctuation removed.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '_')
                .to_lowercase()
        })
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}

fn normalize_symbol_map(map: SymbolMap, repo_name: Option<&str>) -> SymbolMap {
    map.into_iter()
        .map(|(path, functions)| {
            let key = match repo_name {
                Some(name) => strip_repo_prefix(&path, name),
                None => normalize_path(&path),
            };
            (key, functions)
        })
        .collect()
}

/// Exact normalized match first, then an aligned-suffix match.
fn functions_for<'a>(map: &'a SymbolMap, file: &str) -> &'a [String] {
    let key = normalize_path(file);
    if let Some(functions) = map.get(&key) {
        return functions;
    }
    map.iter()
        .find(|(path, _)| paths_match(path, &key))
        .map(|(_, functions)| functions.as_slice())
        .unwrap_or(&[])
}
