//! Git adapter for the branch workflow.
//!
//! The workflow needs a handful of porcelain operations and must classify
//! their failures (checkout conflicts, merge conflicts), so we keep a small,
//! explicit wrapper around `git` subprocess calls.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// A `git` invocation that exited unsuccessfully.
#[derive(Debug, Error)]
#[error("git {command} failed: {stderr}")]
pub struct GitCommandFailed {
    pub command: String,
    pub stderr: String,
}

impl GitCommandFailed {
    /// True when checkout refused because local changes would be overwritten.
    pub fn is_local_changes_conflict(&self) -> bool {
        self.stderr.contains("would be overwritten")
            || self.stderr.contains("Please commit your changes or stash them")
    }
}

/// Result of merging a branch into the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeResult {
    UpToDate,
    FastForward,
    /// A merge commit was created.
    Merged,
    /// Conflicts were found; the merge was aborted.
    Conflicted,
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    envs: Vec<(OsString, OsString)>,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            envs: Vec::new(),
        }
    }

    /// Extra environment for every git invocation (e.g. isolated config in tests).
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Top-level directory of the repository containing the workdir, if any.
    #[instrument(skip_all)]
    pub fn toplevel(&self) -> Result<Option<PathBuf>> {
        let output = self.run(&["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            debug!(workdir = %self.workdir.display(), "no repository found");
            return Ok(None);
        }
        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(PathBuf::from(top)))
    }

    /// Same environment, rooted at another directory.
    pub fn at(&self, workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            envs: self.envs.clone(),
        }
    }

    /// Return the current branch name (errors on detached HEAD).
    #[instrument(skip_all)]
    pub fn current_branch(&self) -> Result<String> {
        let out = self.run_capture(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = out.trim().to_string();
        if name == "HEAD" {
            warn!("detached HEAD detected");
            return Err(anyhow!("detached HEAD"));
        }
        debug!(branch = %name, "current branch");
        Ok(name)
    }

    /// Check whether a local branch exists.
    pub fn branch_exists(&self, branch: &str) -> Result<bool> {
        let status = self
            .run(&[
                "show-ref",
                "--verify",
                "--quiet",
                &format!("refs/heads/{branch}"),
            ])?
            .status;
        Ok(status.success())
    }

    /// Create a branch at `start_point` without checking it out.
    #[instrument(skip_all, fields(branch, start_point))]
    pub fn create_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        debug!(branch, start_point, "creating branch");
        self.run_checked(&["branch", branch, start_point])?;
        Ok(())
    }

    /// Force-delete a local branch.
    #[instrument(skip_all, fields(branch))]
    pub fn delete_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, "deleting branch");
        self.run_checked(&["branch", "-D", branch])?;
        Ok(())
    }

    /// Checkout an existing branch.
    ///
    /// Failures carry a [`GitCommandFailed`] so callers can tell local-change
    /// conflicts apart from other errors.
    #[instrument(skip_all, fields(branch))]
    pub fn checkout_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, "checking out branch");
        self.run_checked(&["checkout", branch])?;
        Ok(())
    }

    /// Stage everything under the given paths (respects .gitignore).
    pub fn add_paths(&self, paths: &[&Path]) -> Result<()> {
        let mut args: Vec<String> = vec!["add".into(), "-A".into(), "--".into()];
        args.extend(paths.iter().map(|p| p.display().to_string()));
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_checked(&args)?;
        Ok(())
    }

    /// True if there is anything staged for commit.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let out = self.run(&["diff", "--cached", "--name-only"])?;
        Ok(!String::from_utf8_lossy(&out.stdout).trim().is_empty())
    }

    /// Commit staged changes with a message.
    ///
    /// If there are no staged changes, this returns Ok(false) and does nothing.
    #[instrument(skip_all)]
    pub fn commit_staged(&self, message: &str) -> Result<bool> {
        if !self.has_staged_changes()? {
            debug!("no staged changes, skipping commit");
            return Ok(false);
        }
        debug!("committing staged changes");
        self.run_checked(&["commit", "-m", message])?;
        Ok(true)
    }

    /// Read a config value; `None` when unset.
    pub fn config_value(&self, key: &str) -> Result<Option<String>> {
        let output = self.run(&["config", "--get", key])?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }

    /// True when both `user.name` and `user.email` resolve.
    pub fn has_author(&self) -> Result<bool> {
        Ok(self.config_value("user.name")?.is_some() && self.config_value("user.email")?.is_some())
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let output = self.run(&["merge-base", "--is-ancestor", ancestor, descendant])?;
        Ok(output.status.success())
    }

    /// Merge `branch` into the current branch.
    ///
    /// Fast-forwards when possible, otherwise records a merge commit with
    /// `message`. Conflicting merges are aborted and reported as
    /// [`MergeResult::Conflicted`].
    #[instrument(skip_all, fields(branch))]
    pub fn merge(&self, branch: &str, message: &str) -> Result<MergeResult> {
        if self.is_ancestor(branch, "HEAD")? {
            debug!(branch, "already up to date");
            return Ok(MergeResult::UpToDate);
        }
        let fast_forward = self.is_ancestor("HEAD", branch)?;
        let output = self.run(&["merge", "--ff", "--no-edit", "-m", message, branch])?;
        if output.status.success() {
            return Ok(if fast_forward {
                MergeResult::FastForward
            } else {
                MergeResult::Merged
            });
        }

        let unmerged = self.run_capture(&["diff", "--name-only", "--diff-filter=U"])?;
        if unmerged.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandFailed {
                command: format!("merge {branch}"),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }
        warn!(branch, "merge conflicts, aborting merge");
        self.run_checked(&["merge", "--abort"])?;
        Ok(MergeResult::Conflicted)
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandFailed {
                command: args.join(" "),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}
