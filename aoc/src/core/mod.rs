//! Deterministic, pure logic shared by the commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data (page markup, fixture text, answers) and return deterministic outputs
//! suitable for tests.

pub mod date;
pub mod document;
pub mod error;
pub mod fixture;
pub mod layout;
pub mod problem_parser;
pub mod submission;
pub mod timing;
pub mod types;
