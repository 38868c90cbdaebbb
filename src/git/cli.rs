//! Subprocess wrapper around the `git` executable.

use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

/// Paths excluded from staged diffs by default. Lock and snapshot files are
/// machine-generated noise that would dominate the summaries.
const DEFAULT_EXCLUDES: &[&str] = &["package-lock.json", "*.lock", "*.snap", "go.sum"];

const DEFAULT_DIFF_UNIFIED: u32 = 3;

/// Staged-changes reader and commit writer backed by `git` subprocess calls.
pub struct GitCli {
    exclude_list: Vec<String>,
    diff_unified: u32,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl GitCli {
    /// Build a wrapper whose diffs exclude the default noise patterns plus
    /// `extra_excludes`.
    pub fn new(extra_excludes: Vec<String>, diff_unified: Option<u32>) -> Self {
        let mut exclude_list: Vec<String> =
            DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect();
        exclude_list.extend(extra_excludes);
        Self {
            exclude_list,
            diff_unified: diff_unified.unwrap_or(DEFAULT_DIFF_UNIFIED),
        }
    }

    /// Fail fast when `git` is not on PATH.
    pub fn ensure_installed() -> Result<(), GitError> {
        which::which("git").map_err(|_| GitError::GitNotInstalled)?;
        Ok(())
    }

    fn exclude_pathspecs(&self) -> impl Iterator<Item = String> + '_ {
        self.exclude_list
            .iter()
            .map(|pattern| format!(":(exclude){pattern}"))
    }

    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .output()
            .await
            .map_err(GitError::SpawnFailed)?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.first().unwrap_or(&"git").to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| GitError::InvalidOutput {
            command: args.first().unwrap_or(&"git").to_string(),
        })
    }

    /// Root of the working tree, used to run the pipeline with repo-relative
    /// paths.
    pub async fn repo_root(&self) -> Result<PathBuf, GitError> {
        let out = self
            .run(&["rev-parse", "--show-toplevel"])
            .await
            .map_err(|err| match err {
                GitError::CommandFailed { .. } => GitError::NotARepository,
                other => other,
            })?;
        Ok(PathBuf::from(out.trim()))
    }

    /// The repository's `.git` directory.
    pub async fn git_dir(&self) -> Result<PathBuf, GitError> {
        let out = self.run(&["rev-parse", "--git-dir"]).await?;
        Ok(PathBuf::from(out.trim()))
    }

    /// The repository's hooks directory.
    pub async fn hooks_dir(&self) -> Result<PathBuf, GitError> {
        let out = self.run(&["rev-parse", "--git-path", "hooks"]).await?;
        Ok(PathBuf::from(out.trim()))
    }

    /// Names of staged files, honoring the exclude list.
    ///
    /// Errors with [`GitError::NoStagedChanges`] when nothing is staged, so
    /// callers do not start a pipeline with no work.
    pub async fn staged_file_names(&self) -> Result<Vec<String>, GitError> {
        let mut args = vec![
            "diff".to_string(),
            "--name-only".to_string(),
            "--staged".to_string(),
        ];
        args.extend(self.exclude_pathspecs());
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        let out = self.run(&arg_refs).await?;
        let names: Vec<String> = out.lines().map(str::to_string).collect();
        if names.is_empty() {
            return Err(GitError::NoStagedChanges);
        }
        Ok(names)
    }

    /// Short-format status output, rename detection disabled so renames
    /// surface as delete + add pairs.
    pub async fn status(&self) -> Result<String, GitError> {
        self.run(&["status", "--short", "--no-renames"]).await
    }

    /// Staged unified diff for a single file.
    pub async fn diff_file(&self, file: &str) -> Result<String, GitError> {
        let unified = format!("--unified={}", self.diff_unified);
        let mut args = vec![
            "diff".to_string(),
            "--ignore-all-space".to_string(),
            "--no-color".to_string(),
            "--diff-algorithm=minimal".to_string(),
            unified,
            "--staged".to_string(),
        ];
        args.extend(self.exclude_pathspecs());
        args.push(file.to_string());
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        self.run(&arg_refs).await
    }

    /// Content of a staged-deleted file, read from HEAD where its blob
    /// still lives until the deletion is committed.
    pub async fn show_deleted_file(&self, file: &str) -> Result<String, GitError> {
        let spec = format!("HEAD:{file}");
        self.run(&["show", &spec]).await
    }

    /// Create the commit with the generated message.
    pub async fn commit(&self, message: &str) -> Result<String, GitError> {
        let message_arg = format!("--message={message}");
        self.run(&["commit", "--no-verify", "--signoff", &message_arg])
            .await
    }
}
