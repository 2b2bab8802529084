//! Per-problem files on disk: README, input, solution stub and fixtures.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;
use tracing::debug;

use crate::core::layout::{problem_dir, problem_label};
use crate::core::problem_parser::SITE_URL;
use crate::core::types::Problem;
use crate::io::console::{Reporter, emphasize};

pub const README_FILE: &str = "README.md";
pub const INPUT_FILE: &str = "input.aoc";
pub const SOLUTION_FILE: &str = "solution.rs";

const README_TEMPLATE: &str = include_str!("templates/README.md.jinja");
const SOLUTION_TEMPLATE: &str = include_str!("templates/solution.rs.jinja");

/// Asks the user yes/no questions.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Reads `y/N` answers from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{question} [y/N] ");
        std::io::stdout().flush().context("flush stdout")?;
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read answer from stdin")?;
        Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// Writes problem files under `{root}/{year}/Day{dd}`.
pub struct Scaffolder<'a> {
    root: PathBuf,
    prompter: Option<&'a mut dyn Prompter>,
    reporter: Reporter,
}

impl<'a> Scaffolder<'a> {
    /// Without a prompter, existing files are only replaced on `overwrite`.
    pub fn new(root: impl Into<PathBuf>, reporter: Reporter) -> Self {
        Self {
            root: root.into(),
            prompter: None,
            reporter,
        }
    }

    pub fn with_prompter(mut self, prompter: &'a mut dyn Prompter) -> Self {
        self.prompter = Some(prompter);
        self
    }

    /// Write `name` (relative to the problem directory).
    ///
    /// An existing file is replaced when `overwrite` is set; otherwise the
    /// user is asked first. Returns `None` when the write was declined.
    pub fn write_problem_file(
        &mut self,
        year: u16,
        day: u8,
        name: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let path = self.root.join(problem_dir(year, day)).join(name);
        if path.exists() && !overwrite {
            let question = format!("File {} already exists. Overwrite?", path.display());
            let confirmed = match self.prompter.as_deref_mut() {
                Some(prompter) => prompter.confirm(&question)?,
                None => false,
            };
            if !confirmed {
                self.reporter
                    .info(&format!("Skipped {}", emphasize(&path.display().to_string())));
                return Ok(None);
            }
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), "problem file written");
        self.reporter
            .info(&format!("Wrote {}", emphasize(&path.display().to_string())));
        Ok(Some(path))
    }
}

/// Template engine for generated files.
pub struct Templates {
    env: Environment<'static>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template("readme", README_TEMPLATE)
            .expect("readme template should be valid");
        env.add_template("solution", SOLUTION_TEMPLATE)
            .expect("solution template should be valid");
        Self { env }
    }

    pub fn render_readme(&self, problem: &Problem) -> Result<String> {
        let template = self.env.get_template("readme")?;
        let rendered = template.render(context! {
            problem => ProblemContext::new(problem.year(), problem.day()),
            content => problem.content_markdown().trim(),
        })?;
        Ok(rendered)
    }

    pub fn render_solution(&self, year: u16, day: u8) -> Result<String> {
        let template = self.env.get_template("solution")?;
        let rendered = template.render(context! {
            problem => ProblemContext::new(year, day),
        })?;
        Ok(rendered)
    }
}

/// Problem identity exposed to templates.
#[derive(Debug, Clone, Serialize)]
struct ProblemContext {
    year: u16,
    day: u8,
    day_padded: String,
    label: String,
    url: String,
}

impl ProblemContext {
    fn new(year: u16, day: u8) -> Self {
        Self {
            year,
            day,
            day_padded: format!("{day:02}"),
            label: problem_label(year, day),
            url: format!("{SITE_URL}/{year}/day/{day}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ProblemAnswers, ProblemLevel};
    use crate::test_support::ScriptedPrompter;

    #[test]
    fn existing_file_is_kept_when_declined() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut prompter = ScriptedPrompter::new([true, false]);
        let mut scaffolder =
            Scaffolder::new(temp.path(), Reporter::new(true)).with_prompter(&mut prompter);

        let first = scaffolder
            .write_problem_file(2023, 5, INPUT_FILE, "old", false)
            .expect("write");
        assert!(first.is_some());

        let replaced = scaffolder
            .write_problem_file(2023, 5, INPUT_FILE, "new", false)
            .expect("write");
        assert!(replaced.is_some());

        let declined = scaffolder
            .write_problem_file(2023, 5, INPUT_FILE, "newer", false)
            .expect("write");
        assert_eq!(declined, None);

        let path = temp.path().join("2023").join("Day05").join(INPUT_FILE);
        assert_eq!(fs::read_to_string(path).expect("read"), "new");
        drop(scaffolder);
        assert_eq!(prompter.asked(), 2);
    }

    #[test]
    fn without_prompter_existing_files_are_kept() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut scaffolder = Scaffolder::new(temp.path(), Reporter::new(true));
        scaffolder
            .write_problem_file(2023, 5, README_FILE, "a", false)
            .expect("write");
        let second = scaffolder
            .write_problem_file(2023, 5, README_FILE, "b", false)
            .expect("write");
        assert_eq!(second, None);
    }

    #[test]
    fn overwrite_skips_the_prompt() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut prompter = ScriptedPrompter::new([]);
        let mut scaffolder =
            Scaffolder::new(temp.path(), Reporter::new(true)).with_prompter(&mut prompter);
        scaffolder
            .write_problem_file(2023, 5, "test/a.aoc", "a", true)
            .expect("write");
        scaffolder
            .write_problem_file(2023, 5, "test/a.aoc", "b", true)
            .expect("write");
        drop(scaffolder);
        assert_eq!(prompter.asked(), 0);
    }

    #[test]
    fn readme_contains_the_statement() {
        let problem = Problem::new(
            2023,
            5,
            ProblemLevel::PartOne,
            "1".to_string(),
            ProblemAnswers::default(),
            "<h2>--- Day 5 ---</h2>".to_string(),
        )
        .expect("problem");
        let readme = Templates::new().render_readme(&problem).expect("render");
        assert!(readme.starts_with("# 2023 Day 5\n"));
        assert!(readme.contains("https://adventofcode.com/2023/day/5"));
        assert!(readme.contains("<h2>--- Day 5 ---</h2>"));
    }

    #[test]
    fn solution_stub_names_the_problem() {
        let stub = Templates::new().render_solution(2023, 5).expect("render");
        assert!(stub.contains("pub struct Y2023D05;"));
        assert!(stub.contains("registry.register(2023, 5,"));
    }
}
