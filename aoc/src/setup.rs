//! `aoc setup`: fetch a problem, scaffold its files and open its branch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::fixture::{FIXTURE_TEMPLATE, answer_fixture_name, render_fixture};
use crate::core::layout::problem_label;
use crate::core::problem_parser::parse_problem;
use crate::core::types::{Problem, ProblemTestCase};
use crate::io::console::{Reporter, emphasize};
use crate::io::http::ContentFetcher;
use crate::io::scaffold::{INPUT_FILE, README_FILE, SOLUTION_FILE, Scaffolder, Templates};
use crate::workflow::{ProblemBranch, RepositoryWorkflow};

/// Name of the blank fixture template; not picked up as a fixture.
pub const FIXTURE_TEMPLATE_FILE: &str = "test/template.txt";

#[derive(Debug)]
pub struct SetupOutcome {
    /// Files actually written (declined overwrites are absent).
    pub written: Vec<PathBuf>,
    pub branch: Option<ProblemBranch>,
}

/// Fetch the page and input for a problem and parse them.
pub fn fetch_problem(fetcher: &dyn ContentFetcher, year: u16, day: u8) -> Result<Problem> {
    let page = fetcher
        .fetch_problem_page(year, day)
        .with_context(|| format!("fetch problem page for {}", problem_label(year, day)))?;
    let input = fetcher
        .fetch_problem_input(year, day)
        .with_context(|| format!("fetch input for {}", problem_label(year, day)))?;
    Ok(parse_problem(year, day, &page, &input)?)
}

/// Write README, input and one regression fixture per revealed answer.
pub fn write_problem_files(
    scaffolder: &mut Scaffolder<'_>,
    templates: &Templates,
    problem: &Problem,
    overwrite: bool,
) -> Result<Vec<PathBuf>> {
    let (year, day) = (problem.year(), problem.day());
    let mut written = Vec::new();
    let readme = templates.render_readme(problem)?;
    written.extend(scaffolder.write_problem_file(year, day, README_FILE, &readme, overwrite)?);
    written.extend(scaffolder.write_problem_file(
        year,
        day,
        INPUT_FILE,
        problem.input(),
        overwrite,
    )?);
    for (level, answer) in problem.answers().revealed() {
        let fixture = render_fixture(&ProblemTestCase {
            level,
            input: problem.input().to_string(),
            expected_output: answer.to_string(),
        });
        let name = format!("test/{}", answer_fixture_name(level));
        written.extend(scaffolder.write_problem_file(year, day, &name, &fixture, overwrite)?);
    }
    Ok(written)
}

/// Run the setup command.
///
/// `workflow` is `None` when git integration is disabled.
#[instrument(skip(fetcher, scaffolder, workflow, reporter))]
pub fn run_setup(
    fetcher: &dyn ContentFetcher,
    scaffolder: &mut Scaffolder<'_>,
    workflow: Option<&RepositoryWorkflow>,
    reporter: &Reporter,
    year: u16,
    day: u8,
) -> Result<SetupOutcome> {
    let problem = fetch_problem(fetcher, year, day)?;
    debug!(level = %problem.level(), "problem parsed");

    let templates = Templates::new();
    let mut written = write_problem_files(scaffolder, &templates, &problem, false)?;
    let stub = templates.render_solution(year, day)?;
    written.extend(scaffolder.write_problem_file(year, day, SOLUTION_FILE, &stub, false)?);
    written.extend(scaffolder.write_problem_file(
        year,
        day,
        FIXTURE_TEMPLATE_FILE,
        FIXTURE_TEMPLATE,
        false,
    )?);

    let branch = match workflow {
        Some(workflow) => Some(workflow.setup_problem(year, day)?),
        None => None,
    };
    reporter.success(&format!(
        "Problem {} is ready (level: {})",
        emphasize(&problem_label(year, day)),
        problem.level()
    ));
    Ok(SetupOutcome { written, branch })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{AocError, HttpFailure, find_domain_error};
    use crate::test_support::{ScriptedFetcher, problem_page};

    #[test]
    fn writes_files_and_answer_fixtures_without_git() {
        let temp = tempfile::tempdir().expect("tempdir");
        let fetcher = ScriptedFetcher::new()
            .with_page(problem_page(&["<p>One</p>"], &["6"], Some("2")))
            .with_input("1,2,3\n");
        let mut scaffolder = Scaffolder::new(temp.path(), Reporter::new(true));

        let outcome = run_setup(&fetcher, &mut scaffolder, None, &Reporter::new(true), 2023, 1)
            .expect("setup");

        let dir = temp.path().join("2023").join("Day01");
        assert_eq!(outcome.written.len(), 5);
        assert!(outcome.branch.is_none());
        assert_eq!(
            std::fs::read_to_string(dir.join(INPUT_FILE)).expect("input"),
            "1,2,3"
        );
        assert_eq!(
            std::fs::read_to_string(dir.join("test").join("answer_part_one.aoc")).expect("fixture"),
            "Part: one\nInput:\n1,2,3\nOutput:\n6\n"
        );
        assert!(dir.join("test").join("template.txt").is_file());
        assert!(!dir.join("test").join("answer_part_two.aoc").exists());
    }

    #[test]
    fn fetch_failure_writes_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let fetcher = ScriptedFetcher::new();
        let mut scaffolder = Scaffolder::new(temp.path(), Reporter::new(true));
        let err = run_setup(&fetcher, &mut scaffolder, None, &Reporter::new(true), 2023, 1)
            .unwrap_err();
        assert!(matches!(
            find_domain_error(&err),
            Some(AocError::Http(HttpFailure { status: Some(404), .. }))
        ));
        assert!(!temp.path().join("2023").exists());
    }
}
