//! # Git Tool Handlers
//!
//! The typed operations behind the MCP tool surface. Each handler builds
//! one argument vector, hands it to [`GitRunner`], and post-processes the
//! text result (line splitting at most). The runner is an explicit
//! dependency, injected at construction.

use std::path::Path;

use crate::runner::{GitError, GitRunner};

/// Number of commits `commit_history` returns when the caller does not say.
pub const DEFAULT_HISTORY_LEN: i64 = 10;

/// The five read-only git query operations.
#[derive(Debug, Clone)]
pub struct GitTools {
    runner: GitRunner,
}

impl GitTools {
    pub fn new(runner: GitRunner) -> Self {
        Self { runner }
    }

    /// Last `n` commit hashes, most recent first.
    ///
    /// `n <= 0` yields an empty list without invoking git.
    pub async fn commit_history(
        &self,
        n: i64,
        cwd: Option<&Path>,
    ) -> Result<Vec<String>, GitError> {
        if n <= 0 {
            return Ok(Vec::new());
        }
        let count = format!("-n{n}");
        let output = self
            .runner
            .run(&["log", &count, "--pretty=format:%H"], cwd, None)
            .await?;
        Ok(split_lines(&output))
    }

    /// Full commit message (subject and body) for one commit, trimmed.
    pub async fn commit_message(
        &self,
        commit_hash: &str,
        cwd: Option<&Path>,
    ) -> Result<String, GitError> {
        self.runner
            .run(&["log", "-1", "--pretty=format:%B", commit_hash], cwd, None)
            .await
    }

    /// Diff introduced by one commit, commit header suppressed, zero
    /// context lines.
    pub async fn commit_diff(
        &self,
        commit_hash: &str,
        cwd: Option<&Path>,
    ) -> Result<String, GitError> {
        self.runner
            .run(
                &["show", commit_hash, "--pretty=format:", "--unified=0"],
                cwd,
                None,
            )
            .await
    }

    /// Paths touched by one commit.
    pub async fn changed_files(
        &self,
        commit_hash: &str,
        cwd: Option<&Path>,
    ) -> Result<Vec<String>, GitError> {
        let output = self
            .runner
            .run(
                &["diff-tree", "--no-commit-id", "--name-only", "-r", commit_hash],
                cwd,
                None,
            )
            .await?;
        Ok(split_lines(&output))
    }

    /// Whether `cwd` is inside a git work tree.
    ///
    /// A non-zero exit from `rev-parse` means "no repository here" and maps
    /// to `false`. Spawn failures and timeouts stay errors; they say
    /// nothing about the directory.
    pub async fn is_repo(&self, cwd: Option<&Path>) -> Result<bool, GitError> {
        match self
            .runner
            .run(&["rev-parse", "--is-inside-work-tree"], cwd, None)
            .await
        {
            Ok(_) => Ok(true),
            Err(GitError::ExitFailure { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }
}

/// Empty output stays an empty list, never `vec![""]`.
fn split_lines(output: &str) -> Vec<String> {
    output.lines().map(str::to_string).collect()
}
