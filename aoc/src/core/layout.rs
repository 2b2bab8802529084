//! Deterministic names for per-problem files and branches.

use std::path::PathBuf;

/// Directory holding a problem's files, relative to the repository root.
pub fn problem_dir(year: u16, day: u8) -> PathBuf {
    PathBuf::from(year.to_string()).join(format!("Day{day:02}"))
}

/// Directory holding a problem's fixtures, relative to the repository root.
pub fn fixture_dir(year: u16, day: u8) -> PathBuf {
    problem_dir(year, day).join("test")
}

/// Branch tracking a problem's solving progress.
pub fn problem_branch(year: u16, day: u8) -> String {
    format!("problem/{year}/day/{day:02}")
}

/// Compact `Y2023D5` label used in messages and commits.
pub fn problem_label(year: u16, day: u8) -> String {
    format!("Y{year}D{day}")
}
