#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use dce_application::{CommandInterpreter, TaskBuilder};
use dce_core::collaborator::{DiffMode, SymbolExtractor, SymbolMap, VcsClient};
use dce_core::config::DceConfig;
use dce_core::error::Result;
use dce_core::session::DceSession;

/// VCS client whose answers are set by the test.
pub struct ScriptedVcs {
    root: PathBuf,
    pub tracked: Mutex<Result<Vec<String>>>,
    pub diff: Mutex<Result<String>>,
    pub untracked: Mutex<Result<Vec<String>>>,
}

impl ScriptedVcs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tracked: Mutex::new(Ok(Vec::new())),
            diff: Mutex::new(Ok(String::new())),
            untracked: Mutex::new(Ok(Vec::new())),
        }
    }

    pub fn with_tracked(self, files: &[&str]) -> Self {
        *self.tracked.lock().unwrap() = Ok(files.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn set_diff(&self, diff: Result<String>) {
        *self.diff.lock().unwrap() = diff;
    }
}

#[async_trait]
impl VcsClient for ScriptedVcs {
    fn repo_root(&self) -> &Path {
        &self.root
    }

    async fn list_tracked_files(&self) -> Result<Vec<String>> {
        self.tracked.lock().unwrap().clone()
    }

    async fn diff_since_last_poll(&self, _mode: DiffMode) -> Result<String> {
        self.diff.lock().unwrap().clone()
    }

    async fn list_untracked_files(&self) -> Result<Vec<String>> {
        self.untracked.lock().unwrap().clone()
    }
}

/// Symbol extractor returning a fixed map.
pub struct StaticSymbols(pub SymbolMap);

#[async_trait]
impl SymbolExtractor for StaticSymbols {
    async fn build_project_symbol_map(&self, _root: &Path) -> Result<SymbolMap> {
        Ok(self.0.clone())
    }
}

pub struct Harness {
    pub vcs: Arc<ScriptedVcs>,
    pub session: Arc<DceSession>,
    pub interpreter: CommandInterpreter,
}

impl Harness {
    pub fn new(vcs: ScriptedVcs, symbols: SymbolMap) -> Self {
        let vcs = Arc::new(vcs);
        let builder = TaskBuilder::new(
            vcs.clone(),
            Arc::new(StaticSymbols(symbols)),
            Duration::from_secs(5),
        );
        let session = Arc::new(DceSession::new(
            "conv-test",
            vcs.clone(),
            &DceConfig::default(),
        ));
        Self {
            vcs,
            session,
            interpreter: CommandInterpreter::new(Arc::new(builder)),
        }
    }

    pub fn empty() -> Self {
        Self::new(ScriptedVcs::new("/tmp/none"), SymbolMap::new())
    }

    /// Runs a slash command and returns its text, panicking if it was not one.
    pub async fn run(&self, input: &str) -> String {
        self.interpreter
            .handle(input, &self.session)
            .await
            .unwrap_or_else(|| panic!("{input:?} was not treated as a command"))
            .text()
    }
}
