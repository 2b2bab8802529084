//! Test-only helpers: temporary git repositories, scripted collaborators and
//! page builders.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

use crate::core::error::HttpFailure;
use crate::core::layout::fixture_dir;
use crate::core::types::ProblemLevel;
use crate::io::config::{SESSION_LEN, SESSION_PREFIX};
use crate::io::git::Git;
use crate::io::http::ContentFetcher;
use crate::io::scaffold::Prompter;
use crate::solver::{Solver, SolverOutput, SolverRegistry, answer};

/// A session cookie with the expected shape.
pub fn valid_session() -> String {
    let body = "0123456789abcdef".repeat(SESSION_LEN / 16);
    format!("{SESSION_PREFIX}{}", &body[..SESSION_LEN - SESSION_PREFIX.len()])
}

/// Problem page with one `article` per statement part.
///
/// `answers[i]` is revealed right after article `i`; `level` is the value of
/// the answer form's hidden input, and `None` omits the form.
pub fn problem_page(articles: &[&str], answers: &[&str], level: Option<&str>) -> String {
    let mut body = String::new();
    for (i, article) in articles.iter().enumerate() {
        body.push_str(&format!("<article class=\"day-desc\">{article}</article>\n"));
        if let Some(answer) = answers.get(i) {
            body.push_str(&format!(
                "<p>Your puzzle answer was <code>{answer}</code>.</p>\n"
            ));
        }
    }
    if let Some(level) = level {
        body.push_str(&format!(
            "<form method=\"post\" action=\"5/answer\"><input type=\"hidden\" name=\"level\" value=\"{level}\"/>\
             <p>Answer: <input type=\"text\" name=\"answer\"/> <input type=\"submit\" value=\"[Submit]\"/></p></form>\n"
        ));
    }
    format!("<!DOCTYPE html>\n<html><head><title>Day</title></head><body><main>\n{body}</main></body></html>")
}

/// Answer response for an accepted answer.
pub fn correct_answer_page(completed_day: Option<u8>) -> String {
    let completed = completed_day
        .map(|day| format!("<p>You have completed Day {day}! You can <span class=\"share\">[Share]</span> this victory.</p>"))
        .unwrap_or_default();
    format!(
        "<html><body><main><article><p><span class=\"day-success\">That's the right answer!</span>  You are one gold star closer. <a href=\"/2023/day/5#part2\">[Continue to Part Two]</a></p>{completed}</article></main></body></html>"
    )
}

/// Answer response for a rejected answer.
pub fn wrong_answer_page(text: &str) -> String {
    format!("<html><body><main><article><p>{text}</p></article></main></body></html>")
}

/// Write a fixture file into a problem's test directory.
pub fn write_fixture(root: &Path, year: u16, day: u8, name: &str, contents: &str) {
    let dir = root.join(fixture_dir(year, day));
    fs::create_dir_all(&dir).expect("create fixture dir");
    fs::write(dir.join(name), contents).expect("write fixture");
}

/// Part one sums comma or newline separated integers; part two multiplies them.
struct SumSolver;

fn numbers(input: &str) -> Result<Vec<i64>> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().with_context(|| format!("not a number: {s}")))
        .collect()
}

impl Solver for SumSolver {
    fn part_one(&self, input: &str) -> SolverOutput {
        answer(numbers(input)?.iter().sum::<i64>())
    }

    fn part_two(&self, input: &str) -> SolverOutput {
        answer(numbers(input)?.iter().product::<i64>())
    }
}

struct UnfinishedSolver;

impl Solver for UnfinishedSolver {
    fn part_one(&self, _input: &str) -> SolverOutput {
        Ok(None)
    }

    fn part_two(&self, _input: &str) -> SolverOutput {
        Ok(None)
    }
}

fn sum_solver() -> Result<Box<dyn Solver>> {
    Ok(Box::new(SumSolver))
}

fn unfinished_solver() -> Result<Box<dyn Solver>> {
    Ok(Box::new(UnfinishedSolver))
}

/// Registry with the summing solver registered for one problem.
pub fn sum_registry(year: u16, day: u8) -> SolverRegistry {
    let mut registry = SolverRegistry::new();
    registry.register(year, day, sum_solver);
    registry
}

/// Registry whose solver returns no result for either part.
pub fn unfinished_registry(year: u16, day: u8) -> SolverRegistry {
    let mut registry = SolverRegistry::new();
    registry.register(year, day, unfinished_solver);
    registry
}

/// An answer posted through [`ScriptedFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub year: u16,
    pub day: u8,
    pub level: ProblemLevel,
    pub answer: String,
}

/// [`ContentFetcher`] serving queued pages.
///
/// Pages and inputs are consumed in order, the last one being served again
/// once the queue is down to it. Submission responses are consumed once.
/// Missing content fails like a 404.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: RefCell<VecDeque<String>>,
    inputs: RefCell<VecDeque<String>>,
    responses: RefCell<VecDeque<String>>,
    submissions: RefCell<Vec<Submission>>,
    calls: RefCell<Vec<&'static str>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, html: impl Into<String>) -> Self {
        self.pages.borrow_mut().push_back(html.into());
        self
    }

    pub fn with_input(self, input: impl Into<String>) -> Self {
        self.inputs.borrow_mut().push_back(input.into());
        self
    }

    pub fn with_response(self, html: impl Into<String>) -> Self {
        self.responses.borrow_mut().push_back(html.into());
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.borrow().clone()
    }

    /// `"page"`, `"input"` and `"submit"` in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn sticky(queue: &RefCell<VecDeque<String>>, url: String) -> Result<String> {
        let mut queue = queue.borrow_mut();
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.ok_or_else(|| not_found(url))
    }
}

fn not_found(url: String) -> anyhow::Error {
    HttpFailure {
        url,
        status: Some(404),
        reason: Some("Not Found".to_string()),
    }
    .into()
}

impl ContentFetcher for ScriptedFetcher {
    fn fetch_problem_page(&self, year: u16, day: u8) -> Result<String> {
        self.calls.borrow_mut().push("page");
        Self::sticky(&self.pages, format!("scripted/{year}/day/{day}"))
    }

    fn fetch_problem_input(&self, year: u16, day: u8) -> Result<String> {
        self.calls.borrow_mut().push("input");
        Self::sticky(&self.inputs, format!("scripted/{year}/day/{day}/input"))
    }

    fn submit_answer(
        &self,
        year: u16,
        day: u8,
        level: ProblemLevel,
        answer: &str,
    ) -> Result<String> {
        self.calls.borrow_mut().push("submit");
        self.submissions.borrow_mut().push(Submission {
            year,
            day,
            level,
            answer: answer.to_string(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| not_found(format!("scripted/{year}/day/{day}/answer")))
    }
}

/// [`Prompter`] answering from a fixed script; answers "no" once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    asked: usize,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }

    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        self.asked += 1;
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

/// Temporary git repository with an author, one commit and isolated config.
pub struct TestRepo {
    _temp: TempDir,
    root: PathBuf,
    global_config: PathBuf,
}

impl TestRepo {
    pub fn new(default_branch: &str) -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let root = temp.path().join("repo");
        fs::create_dir_all(&root).context("create repo dir")?;
        let global_config = temp.path().join("gitconfig");
        fs::write(&global_config, "").context("write isolated git config")?;

        let repo = Self {
            _temp: temp,
            root,
            global_config,
        };
        repo.git_ok(&["init", "--quiet"])?;
        repo.git_ok(&["symbolic-ref", "HEAD", &format!("refs/heads/{default_branch}")])?;
        repo.git_ok(&["config", "user.name", "Test User"])?;
        repo.git_ok(&["config", "user.email", "test@example.com"])?;
        repo.git_ok(&["config", "commit.gpgsign", "false"])?;
        repo.commit_file("README.md", "puzzles\n", "initial")?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// [`Git`] bound to this repository and its isolated config.
    pub fn git(&self) -> Git {
        Git::new(&self.root)
            .with_env("GIT_CONFIG_GLOBAL", &self.global_config)
            .with_env("GIT_CONFIG_NOSYSTEM", "1")
    }

    pub fn write_file(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, contents).expect("write file");
    }

    pub fn commit_file(&self, rel: &str, contents: &str, message: &str) -> Result<()> {
        self.write_file(rel, contents);
        self.git_ok(&["add", "--", rel])?;
        self.git_ok(&["commit", "--quiet", "-m", message])?;
        Ok(())
    }

    /// Drop the repository-local author so no identity resolves.
    pub fn remove_author(&self) -> Result<()> {
        self.git_ok(&["config", "--unset", "user.name"])?;
        self.git_ok(&["config", "--unset", "user.email"])?;
        Ok(())
    }

    pub fn current_branch(&self) -> String {
        self.git_output(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn last_commit_message(&self) -> String {
        self.git_output(&["log", "-1", "--format=%s"])
    }

    pub fn branches(&self) -> Vec<String> {
        self.git_output(&["branch", "--format=%(refname:short)"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Commit id a revision resolves to.
    pub fn rev(&self, rev: &str) -> String {
        self.git_output(&["rev-parse", rev])
    }

    /// No staged, unstaged or untracked changes.
    pub fn is_clean(&self) -> bool {
        self.git_output(&["status", "--porcelain"]).is_empty()
    }

    fn git_output(&self, args: &[&str]) -> String {
        self.git_ok(args).expect("git command")
    }

    fn git_ok(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .env("GIT_CONFIG_GLOBAL", &self.global_config)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .current_dir(&self.root)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
