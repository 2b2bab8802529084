//! Stable exit codes for `aoc` commands.

/// Command finished, including non-fatal outcomes such as failed tests or a
/// rejected answer.
pub const OK: i32 = 0;
/// A domain error or an unexpected failure.
pub const FAILURE: i32 = 1;
