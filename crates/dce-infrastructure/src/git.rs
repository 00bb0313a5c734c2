//! Git CLI implementation of [`VcsClient`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use dce_core::collaborator::{DiffMode, VcsClient};
use dce_core::error::{DceError, Result};
use dce_core::path::normalize_path;

/// Runs `git` in a repository root.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Uses `root` as the repository root without checking it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the top-level directory of the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// Returns a VCS error if `dir` is not inside a git work tree.
    pub async fn discover(dir: &Path) -> Result<Self> {
        let output = run_git(dir, &["rev-parse", "--show-toplevel"]).await?;
        let top = output.trim();
        if top.is_empty() {
            return Err(DceError::vcs(
                "git rev-parse",
                format!("{} is not inside a git work tree", dir.display()),
            ));
        }
        Ok(Self::new(top))
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.root, args).await
    }
}

#[async_trait]
impl VcsClient for GitCli {
    fn repo_root(&self) -> &Path {
        &self.root
    }

    async fn list_tracked_files(&self) -> Result<Vec<String>> {
        let stdout = self.git(&["ls-files"]).await?;
        Ok(parse_path_list(&stdout))
    }

    async fn diff_since_last_poll(&self, mode: DiffMode) -> Result<String> {
        match mode {
            DiffMode::Unified0 => self.git(&["diff", "--unified=0"]).await,
            DiffMode::Full => self.git(&["diff"]).await,
        }
    }

    async fn list_untracked_files(&self) -> Result<Vec<String>> {
        let stdout = self
            .git(&["ls-files", "--others", "--exclude-standard"])
            .await?;
        Ok(parse_path_list(&stdout))
    }
}

async fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let operation = format!("git {}", args.join(" "));
    tracing::debug!("Executing {} in {}", operation, dir.display());

    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| DceError::vcs(&operation, format!("Failed to execute git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DceError::vcs(
            &operation,
            format!("{} ({})", stderr.trim(), output.status),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Splits newline-separated git path output, dropping blanks.
fn parse_path_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(normalize_path)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_path_list() {
        let paths = parse_path_list("cmd/root.go\n\n./internal/x.go\r\n  \n");
        assert_eq!(paths, vec!["cmd/root.go", "internal/x.go"]);
    }

    #[tokio::test]
    async fn test_list_outside_repository_is_vcs_error() {
        let temp = TempDir::new().unwrap();
        let git = GitCli::new(temp.path());

        let err = git.list_tracked_files().await.unwrap_err();

        assert!(err.is_vcs());
        assert!(err.to_string().contains("git ls-files"));
    }
}
