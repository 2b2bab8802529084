//! Run a problem's solver against its `*.aoc` fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::fixture::{FIXTURE_EXTENSION, parse_fixture};
use crate::core::layout::{fixture_dir, problem_label};
use crate::io::console::{Reporter, elapsed, emphasize};
use crate::solver::SolverRegistry;

/// First fixture whose output did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseFailure {
    pub path: PathBuf,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestRunOutcome {
    /// No fixture directory; treated as passing.
    NoTests,
    Passed { count: usize },
    Failed(TestCaseFailure),
}

impl TestRunOutcome {
    pub fn all_passed(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Run every fixture of a problem in file-name order, stopping at the first mismatch.
///
/// Invalid fixtures and solver failures are errors, not outcomes.
#[instrument(skip(root, registry, reporter))]
pub fn run_all(
    root: &Path,
    year: u16,
    day: u8,
    registry: &SolverRegistry,
    reporter: &Reporter,
) -> Result<TestRunOutcome> {
    let dir = root.join(fixture_dir(year, day));
    if !dir.is_dir() {
        reporter.warn(&format!(
            "No tests found for {} in {}",
            problem_label(year, day),
            dir.display()
        ));
        return Ok(TestRunOutcome::NoTests);
    }

    let fixtures = list_fixtures(&dir)?;
    let solver = registry.resolve(year, day)?;
    for path in &fixtures {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let case = parse_fixture(path, &contents)?;
        let solved = solver.solve(case.level, &case.input)?;
        let name = file_name(path);
        debug!(fixture = %name, "fixture evaluated");
        if solved.answer != case.expected_output {
            reporter.error(&format!(
                "Test {} failed: expected {}, got {}",
                emphasize(&name),
                emphasize(&case.expected_output),
                emphasize(&solved.answer)
            ));
            return Ok(TestRunOutcome::Failed(TestCaseFailure {
                path: path.clone(),
                expected: case.expected_output,
                actual: solved.answer,
            }));
        }
        reporter.success(&format!(
            "Test {} passed in {}",
            emphasize(&name),
            elapsed(solved.elapsed)
        ));
    }
    Ok(TestRunOutcome::Passed {
        count: fixtures.len(),
    })
}

fn list_fixtures(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut fixtures = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("read entry in {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION) {
            fixtures.push(path);
        }
    }
    fixtures.sort();
    Ok(fixtures)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
