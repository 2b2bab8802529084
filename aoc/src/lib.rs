//! Command-line assistant for Advent of Code style puzzles.
//!
//! The crate fetches problem statements and inputs, scaffolds per-problem
//! files, runs registered solutions against fixtures, submits answers and
//! keeps a branch per problem in git.
//!
//! - **[`core`]**: Pure logic (page parsing, fixtures, submission responses,
//!   naming). No I/O.
//! - **[`io`]**: Side effects (config store, HTTP, git, files, terminal).
//!
//! Command modules ([`init`], [`setup`], [`solve`]) coordinate the two;
//! [`workflow`] owns the branch lifecycle and [`test_runner`] the fixtures.

pub mod core;
pub mod exit_codes;
pub mod init;
pub mod io;
pub mod logging;
pub mod setup;
pub mod solutions;
pub mod solve;
pub mod solver;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod test_runner;
pub mod workflow;
