//! Per-problem branch lifecycle.
//!
//! Each problem lives on `problem/{year}/day/{dd}`, created from the default
//! branch tip at setup, committed after every correct answer, and merged
//! back into the default branch once both parts are solved.
//!
//! The repository is discovered at the start of every operation and nothing
//! is held open between calls.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::core::error::GitError;
use crate::core::layout::{problem_branch, problem_dir, problem_label};
use crate::core::types::ProblemLevel;
use crate::io::console::{Reporter, emphasize};
use crate::io::git::{Git, GitCommandFailed, MergeResult};

/// What `advance_after_solve` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The problem was set up without git; nothing to record.
    NoBranch,
    Committed,
    /// Committed, then merged into the default branch.
    Merged(MergeResult),
}

/// A problem branch resolved for the current operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemBranch {
    pub name: String,
    /// Created by this operation (and removed again on rollback).
    pub is_new: bool,
}

pub struct RepositoryWorkflow {
    start: Git,
    project_root: PathBuf,
    default_branch: String,
    reporter: Reporter,
}

impl RepositoryWorkflow {
    /// `git` is rooted where the command runs; problem files live under
    /// `project_root`.
    pub fn new(
        git: Git,
        project_root: impl Into<PathBuf>,
        default_branch: impl Into<String>,
        reporter: Reporter,
    ) -> Self {
        Self {
            start: git,
            project_root: project_root.into(),
            default_branch: default_branch.into(),
            reporter,
        }
    }

    /// Handle on the repository containing the start directory.
    pub fn discover(&self) -> Result<Git> {
        let top = self
            .start
            .toplevel()?
            .ok_or_else(|| GitError::RepositoryNotFound(self.start.workdir().to_path_buf()))?;
        debug!(root = %top.display(), "repository discovered");
        Ok(self.start.at(top))
    }

    /// Create the problem branch from the default branch tip unless it exists.
    pub fn create_or_get_problem_branch(
        &self,
        git: &Git,
        year: u16,
        day: u8,
    ) -> Result<ProblemBranch> {
        let name = problem_branch(year, day);
        if git.branch_exists(&name)? {
            return Ok(ProblemBranch {
                name,
                is_new: false,
            });
        }
        if !git.branch_exists(&self.default_branch)? {
            return Err(GitError::DefaultBranchNotFound(self.default_branch.clone()).into());
        }
        git.create_branch(&name, &self.default_branch)?;
        Ok(ProblemBranch { name, is_new: true })
    }

    /// Checkout `branch`, deleting it again if it was just created and the
    /// checkout fails.
    pub fn checkout(&self, git: &Git, branch: &ProblemBranch) -> Result<()> {
        self.checkout_named(git, &branch.name)
            .inspect_err(|_| self.rollback(git, branch))
    }

    fn checkout_named(&self, git: &Git, name: &str) -> Result<()> {
        match git.checkout_branch(name) {
            Ok(()) => Ok(()),
            Err(err) => match err.downcast_ref::<GitCommandFailed>() {
                Some(failed) if failed.is_local_changes_conflict() => {
                    Err(GitError::RepositoryNotClean(name.to_string()).into())
                }
                Some(failed) => Err(GitError::CheckoutFailed {
                    branch: name.to_string(),
                    reason: failed.stderr.clone(),
                }
                .into()),
                None => Err(err),
            },
        }
    }

    /// Stage the problem directory and commit it.
    ///
    /// Returns `false` when there was nothing to commit.
    pub fn commit_problem_files(
        &self,
        git: &Git,
        year: u16,
        day: u8,
        message: &str,
    ) -> Result<bool> {
        if !git.has_author()? {
            return Err(GitError::AuthorInfoMissing.into());
        }
        let dir = self.project_root.join(problem_dir(year, day));
        git.add_paths(&[dir.as_path()])
            .with_context(|| format!("stage {}", dir.display()))?;
        git.commit_staged(message)
    }

    /// Create, checkout and record the initial commit of a problem branch.
    ///
    /// Returns the branch, whose `is_new` is false when it already existed
    /// (in which case nothing else is done).
    #[instrument(skip(self))]
    pub fn setup_problem(&self, year: u16, day: u8) -> Result<ProblemBranch> {
        let git = self.discover()?;
        let branch = self.create_or_get_problem_branch(&git, year, day)?;
        if !branch.is_new {
            self.reporter.warn(&format!(
                "Branch {} already exists; leaving it untouched",
                emphasize(&branch.name)
            ));
            return Ok(branch);
        }

        let previous = git
            .current_branch()
            .unwrap_or_else(|_| self.default_branch.clone());
        self.checkout(&git, &branch)?;
        let message = format!("Initial commit for {}", problem_label(year, day));
        if let Err(err) = self.commit_problem_files(&git, year, day, &message) {
            self.abandon_new_branch(&git, &branch, &previous);
            return Err(err);
        }
        self.reporter.success(&format!(
            "Created branch {} from {}",
            emphasize(&branch.name),
            emphasize(&self.default_branch)
        ));
        Ok(branch)
    }

    /// Record a correct answer on the problem branch; merge once finished.
    ///
    /// `level` is the problem level after the answer was accepted.
    #[instrument(skip(self))]
    pub fn advance_after_solve(
        &self,
        year: u16,
        day: u8,
        level: ProblemLevel,
    ) -> Result<AdvanceOutcome> {
        let git = self.discover()?;
        let name = problem_branch(year, day);
        if !git.branch_exists(&name)? {
            self.reporter.warn(&format!(
                "Branch {} not found; skipping git update",
                emphasize(&name)
            ));
            return Ok(AdvanceOutcome::NoBranch);
        }

        if git.current_branch().ok().as_deref() != Some(name.as_str()) {
            self.checkout_named(&git, &name)?;
        }
        let solved = match level {
            ProblemLevel::PartTwo => "one",
            _ => "two",
        };
        let message = format!("Solve part {solved} for {}", problem_label(year, day));
        self.commit_problem_files(&git, year, day, &message)?;
        if level != ProblemLevel::Finished {
            self.reporter
                .success(&format!("Committed progress on {}", emphasize(&name)));
            return Ok(AdvanceOutcome::Committed);
        }

        self.checkout_named(&git, &self.default_branch)?;
        let result = git.merge(&name, &format!("Merge {name}"))?;
        if result == MergeResult::Conflicted {
            return Err(GitError::MergeConflict {
                branch: name,
                target: self.default_branch.clone(),
            }
            .into());
        }
        self.reporter.success(&format!(
            "Merged {} into {}",
            emphasize(&name),
            emphasize(&self.default_branch)
        ));
        Ok(AdvanceOutcome::Merged(result))
    }

    fn rollback(&self, git: &Git, branch: &ProblemBranch) {
        if !branch.is_new {
            return;
        }
        if let Err(err) = git.delete_branch(&branch.name) {
            warn!(branch = %branch.name, error = %format!("{err:#}"), "rollback failed");
        }
    }

    /// Return to `previous` and delete a branch created by this operation.
    fn abandon_new_branch(&self, git: &Git, branch: &ProblemBranch, previous: &str) {
        if let Err(err) = git.checkout_branch(previous) {
            warn!(branch = previous, error = %format!("{err:#}"), "could not return to previous branch");
        }
        self.rollback(git, branch);
    }
}
