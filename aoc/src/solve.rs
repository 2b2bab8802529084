//! `aoc solve`: test, compute, submit, then record progress.
//!
//! The flow only moves forward through [`SolveStage`]: nothing is submitted
//! before the fixtures pass, and no file or git change happens before the
//! site accepts the answer.

use std::path::Path;

use anyhow::{Result, anyhow};
use colored::Colorize;
use tracing::{debug, instrument};

use crate::core::layout::problem_label;
use crate::core::submission::{SubmissionResponse, parse_submission_response};
use crate::core::types::ProblemLevel;
use crate::io::console::{Reporter, elapsed, emphasize, highlight};
use crate::io::http::ContentFetcher;
use crate::io::scaffold::{Scaffolder, Templates};
use crate::setup::{fetch_problem, write_problem_files};
use crate::solver::SolverRegistry;
use crate::test_runner::{TestCaseFailure, TestRunOutcome, run_all};
use crate::workflow::{AdvanceOutcome, RepositoryWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SolveStage {
    NotTested,
    Tested,
    Solved,
    Submitted,
    FilesUpdated,
    GitUpdated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    TestsFailed(TestCaseFailure),
    AlreadySolved,
    Incorrect(SubmissionResponse),
    Correct {
        response: SubmissionResponse,
        /// Level after the accepted answer.
        level: ProblemLevel,
        /// `None` when git integration is disabled.
        git: Option<AdvanceOutcome>,
    },
}

/// Collaborators of one solve run.
pub struct SubmissionOrchestrator<'a> {
    root: &'a Path,
    fetcher: &'a dyn ContentFetcher,
    registry: &'a SolverRegistry,
    workflow: Option<&'a RepositoryWorkflow>,
    reporter: Reporter,
    stage: SolveStage,
}

impl<'a> SubmissionOrchestrator<'a> {
    pub fn new(
        root: &'a Path,
        fetcher: &'a dyn ContentFetcher,
        registry: &'a SolverRegistry,
        workflow: Option<&'a RepositoryWorkflow>,
        reporter: Reporter,
    ) -> Self {
        Self {
            root,
            fetcher,
            registry,
            workflow,
            reporter,
            stage: SolveStage::NotTested,
        }
    }

    pub fn stage(&self) -> SolveStage {
        self.stage
    }

    fn advance(&mut self, next: SolveStage) {
        debug_assert!(next > self.stage, "solve stages only move forward");
        debug!(from = ?self.stage, to = ?next, "solve stage");
        self.stage = next;
    }

    #[instrument(skip(self))]
    pub fn run(&mut self, year: u16, day: u8) -> Result<SolveOutcome> {
        let label = problem_label(year, day);

        let tests = run_all(self.root, year, day, self.registry, &self.reporter)?;
        debug!(passed = tests.all_passed(), "fixtures checked");
        if let TestRunOutcome::Failed(failure) = tests {
            self.reporter.verdict(&format!(
                "{} Tests failed for {}; not submitting",
                "Failed:".red().bold(),
                emphasize(&label)
            ));
            return Ok(SolveOutcome::TestsFailed(failure));
        }
        self.advance(SolveStage::Tested);

        let problem = fetch_problem(self.fetcher, year, day)?;
        if problem.level() == ProblemLevel::Finished {
            self.reporter.verdict(&format!(
                "Problem {} is already solved",
                emphasize(&label)
            ));
            return Ok(SolveOutcome::AlreadySolved);
        }

        let level = problem.level();
        let solver = self.registry.resolve(year, day)?;
        let solved = solver.solve(level, problem.input())?;
        self.advance(SolveStage::Solved);
        self.reporter.info(&format!(
            "Part {level} answer: {} ({})",
            emphasize(&solved.answer),
            elapsed(solved.elapsed)
        ));

        if level.submit_value().is_none() {
            return Err(anyhow!("cannot submit an answer for level {level}"));
        }
        let html = self
            .fetcher
            .submit_answer(year, day, level, &solved.answer)?;
        self.advance(SolveStage::Submitted);

        let response = parse_submission_response(&html);
        if !response.correct {
            self.reporter.verdict(&format!(
                "{} {}",
                "Wrong:".red().bold(),
                highlight(&response.message, &response.highlights)
            ));
            return Ok(SolveOutcome::Incorrect(response));
        }
        self.reporter
            .verdict(&format!("{} {}", "Correct:".green().bold(), response.message));

        let updated = fetch_problem(self.fetcher, year, day)?;
        let mut scaffolder = Scaffolder::new(self.root, self.reporter);
        write_problem_files(&mut scaffolder, &Templates::new(), &updated, true)?;
        self.advance(SolveStage::FilesUpdated);

        let git = match self.workflow {
            Some(workflow) => {
                let outcome = workflow.advance_after_solve(year, day, updated.level())?;
                self.advance(SolveStage::GitUpdated);
                Some(outcome)
            }
            None => None,
        };
        Ok(SolveOutcome::Correct {
            response,
            level: updated.level(),
            git,
        })
    }
}
