//! Side-effecting operations: config persistence, network, git, files and
//! terminal output.
//!
//! Every collaborator with a meaningful test double sits behind a trait
//! ([`http::ContentFetcher`], [`config::ConfigStore`], [`scaffold::Prompter`]).

pub mod config;
pub mod console;
pub mod git;
pub mod http;
pub mod scaffold;
