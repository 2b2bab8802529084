//! Domain error taxonomy.
//!
//! Every failure the user is expected to understand and act on is one of the
//! variants below. They travel inside `anyhow::Error` through the command
//! plumbing and are recovered at the top level with [`find_domain_error`] so
//! they can be rendered as a single line. Anything else is treated as an
//! unexpected failure.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems (missing/invalid session, unreadable store).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("session token not found; run `aoc init <session>` first")]
    SessionMissing,
    #[error(
        "invalid session token: expected 128 characters starting with `{expected_prefix}`"
    )]
    InvalidSession { expected_prefix: &'static str },
    #[error("invalid value `{value}` for `{key}`: expected true or false")]
    InvalidFlag { key: &'static str, value: String },
}

/// Non-success response or transport failure for a single HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub url: String,
    /// Absent for pure transport failures (DNS, connection reset).
    pub status: Option<u16>,
    pub reason: Option<String>,
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = &self.url;
        match (self.status, self.reason.as_deref()) {
            (Some(code), Some(reason)) => {
                write!(f, "request to {url} failed: HTTP {code} ({reason})")
            }
            (Some(code), None) => write!(f, "request to {url} failed: HTTP {code}"),
            (None, Some(reason)) => write!(f, "request to {url} failed: {reason}"),
            (None, None) => write!(f, "unknown error requesting {url}"),
        }
    }
}

impl std::error::Error for HttpFailure {}

/// Unexpected shape of a fetched page, a submission response or a fixture file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not find the problem articles in the page")]
    ContentNodeMissing,
    #[error("unrecognized problem level `{0}` in the page form")]
    InvalidLevel(String),
    #[error("problem level {level} does not match {answers} revealed answer(s)")]
    LevelAnswerMismatch { level: &'static str, answers: usize },
    #[error("invalid test fixture {}: {reason}", .path.display())]
    InvalidTestFixture { path: PathBuf, reason: String },
    #[error("invalid date `{0}`: {1}")]
    InvalidDate(String, String),
}

/// Failures resolving or running a registered solver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolverError {
    #[error("no solver registered for Y{year}D{day}")]
    NotFound { year: u16, day: u8 },
    #[error("{count} solvers registered for Y{year}D{day}; keep exactly one")]
    Ambiguous { year: u16, day: u8, count: usize },
    #[error("could not construct solver for Y{year}D{day}: {reason}")]
    Instantiation { year: u16, day: u8, reason: String },
    #[error("solver for Y{year}D{day} part {part} failed: {reason}")]
    Runtime {
        year: u16,
        day: u8,
        part: &'static str,
        reason: String,
    },
    #[error("solver for Y{year}D{day} part {part} returned no result")]
    NullResult {
        year: u16,
        day: u8,
        part: &'static str,
    },
}

/// Repository state problems raised by the branch workflow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitError {
    #[error("could not find a git repository from {}", .0.display())]
    RepositoryNotFound(PathBuf),
    #[error("default branch `{0}` not found; set it with `aoc init <session> --branch <name>`")]
    DefaultBranchNotFound(String),
    #[error(
        "repository has uncommitted changes that conflict with `{0}`; commit or stash them, or use --no-git"
    )]
    RepositoryNotClean(String),
    #[error("could not checkout branch `{branch}`: {reason}")]
    CheckoutFailed { branch: String, reason: String },
    #[error("merging `{branch}` into `{target}` produced conflicts; resolve them manually")]
    MergeConflict { branch: String, target: String },
    #[error("git author not configured; set `git config --global user.name` and `user.email`")]
    AuthorInfoMissing,
}

/// Union of every domain error, used for top-level rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AocError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] HttpFailure),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Find the first domain error in an `anyhow` chain.
///
/// Errors are usually raised as their specific enum and wrapped in context on
/// the way up, so every link of the chain is checked against each type.
pub fn find_domain_error(err: &anyhow::Error) -> Option<AocError> {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<AocError>() {
            return Some(e.clone());
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return Some(AocError::Config(e.clone()));
        }
        if let Some(e) = cause.downcast_ref::<HttpFailure>() {
            return Some(AocError::Http(e.clone()));
        }
        if let Some(e) = cause.downcast_ref::<ParseError>() {
            return Some(AocError::Parse(e.clone()));
        }
        if let Some(e) = cause.downcast_ref::<SolverError>() {
            return Some(AocError::Solver(e.clone()));
        }
        if let Some(e) = cause.downcast_ref::<GitError>() {
            return Some(AocError::Git(e.clone()));
        }
    }
    None
}

impl AocError {
    /// Short category label used as the rendered line prefix.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Http(_) => "http",
            Self::Parse(_) => "parse",
            Self::Solver(_) => "solver",
            Self::Git(_) => "git",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn finds_domain_error_behind_context() {
        let err = Err::<(), _>(GitError::AuthorInfoMissing)
            .context("commit problem files")
            .unwrap_err();
        assert_eq!(
            find_domain_error(&err),
            Some(AocError::Git(GitError::AuthorInfoMissing))
        );
    }

    #[test]
    fn unexpected_errors_are_not_domain_errors() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(find_domain_error(&err), None);
    }

    #[test]
    fn http_failure_without_status_names_the_url() {
        let failure = HttpFailure {
            url: "https://adventofcode.com/2023/day/5".to_string(),
            status: None,
            reason: Some("connection reset".to_string()),
        };
        assert_eq!(
            failure.to_string(),
            "request to https://adventofcode.com/2023/day/5 failed: connection reset"
        );
    }
}
