//! # Git Command Runner
//!
//! Spawns the external `git` binary and captures its output. One child
//! process per call; an optional timeout bounds the wait, and an expired
//! timeout kills the child rather than leaking it.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;

/// Failure modes of a single git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// git ran to completion but exited non-zero.
    #[error("git exited with code {code}: {stderr}")]
    ExitFailure { code: i32, stderr: String },

    /// The timeout elapsed before git finished.
    #[error("git command timed out after {0:?}")]
    TimedOut(Duration),

    /// The child process could not be spawned or waited on.
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Executes git commands in an optional working directory.
///
/// The binary name and the default per-invocation timeout are fixed at
/// construction, so every tool call shares one configuration. The runner
/// holds no other state and is cheap to clone.
#[derive(Debug, Clone)]
pub struct GitRunner {
    binary: String,
    default_timeout: Option<Duration>,
}

impl GitRunner {
    pub fn new(binary: impl Into<String>, default_timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            default_timeout,
        }
    }

    /// Run `git <args>` and return its trimmed stdout.
    ///
    /// `cwd` selects the repository (process default when `None`).
    /// `timeout` overrides the runner's default; with neither set the wait
    /// is unbounded.
    pub async fn run(
        &self,
        args: &[&str],
        cwd: Option<&Path>,
        timeout: Option<Duration>,
    ) -> Result<String, GitError> {
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Dropping the wait future on timeout must take the child with it.
        cmd.kill_on_drop(true);

        tracing::debug!("Running {} {}", self.binary, args.join(" "));

        let child = cmd.spawn()?;

        let output = match timeout.or(self.default_timeout) {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!("git {} timed out after {:?}", args.join(" "), limit);
                    return Err(GitError::TimedOut(limit));
                }
            },
            None => child.wait_with_output().await?,
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!("git {} exited with code {}", args.join(" "), code);
            Err(GitError::ExitFailure { code, stderr })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn run_git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .expect("failed to run git");
        assert!(status.success(), "git {args:?} failed");
    }

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test"]);
        dir
    }

    #[tokio::test]
    async fn returns_trimmed_stdout_on_success() {
        let repo = init_repo();
        let runner = GitRunner::new("git", None);
        let out = runner
            .run(&["rev-parse", "--is-inside-work-tree"], Some(repo.path()), None)
            .await
            .unwrap();
        assert_eq!(out, "true");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_code_and_stderr() {
        let dir = TempDir::new().unwrap();
        let runner = GitRunner::new("git", None);
        let err = runner
            .run(&["rev-parse", "--is-inside-work-tree"], Some(dir.path()), None)
            .await
            .unwrap_err();
        match err {
            GitError::ExitFailure { code, stderr } => {
                assert_ne!(code, 0);
                assert!(stderr.contains("not a git repository"), "stderr: {stderr}");
            }
            other => panic!("expected ExitFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let runner = GitRunner::new("git-binary-that-does-not-exist", None);
        let err = runner.run(&["--version"], None, None).await.unwrap_err();
        assert!(matches!(err, GitError::Spawn(_)));
    }

    #[tokio::test]
    async fn timeout_interrupts_a_blocked_child() {
        // `sleep` stands in for a stalled git invocation.
        let runner = GitRunner::new("sleep", None);
        let err = runner
            .run(&["5"], None, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, GitError::TimedOut(_)));
    }

    #[tokio::test]
    async fn per_call_timeout_overrides_default() {
        let runner = GitRunner::new("sleep", Some(Duration::from_millis(10)));
        // A generous per-call timeout lets the command finish.
        let out = runner
            .run(&["0"], None, Some(Duration::from_secs(10)))
            .await
            .unwrap();
        assert_eq!(out, "");
    }
}
