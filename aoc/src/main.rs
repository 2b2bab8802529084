//! `aoc` command-line entry point.
//!
//! Parses arguments, loads the user configuration and hands off to the
//! command modules. Domain errors are rendered as one line; anything else is
//! printed with its context chain.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use aoc::core::date::ProblemDate;
use aoc::core::error::find_domain_error;
use aoc::exit_codes;
use aoc::init::{InitOptions, run_init};
use aoc::io::config::{ConfigKey, ConfigStore, EnvironmentConfig, TomlConfigStore};
use aoc::io::console::Reporter;
use aoc::io::git::Git;
use aoc::io::http::HttpFetcher;
use aoc::io::scaffold::{Scaffolder, TerminalPrompter};
use aoc::logging;
use aoc::setup::run_setup;
use aoc::solutions;
use aoc::solve::SubmissionOrchestrator;
use aoc::workflow::RepositoryWorkflow;

#[derive(Parser)]
#[command(
    name = "aoc",
    version,
    about = "Fetch, test and submit Advent of Code puzzles"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the session cookie and preferences.
    Init {
        /// Session cookie copied from the browser.
        session: String,
        /// Default git branch problem branches start from.
        #[arg(short, long)]
        branch: Option<String>,
        /// Disable git integration (true/false).
        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        no_git: Option<bool>,
        /// Hide informational output (true/false).
        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        silent: Option<bool>,
    },
    /// Fetch a problem and scaffold its files (YYYY/DD).
    Setup {
        date: ProblemDate,
        /// Skip the git branch for this problem.
        #[arg(long)]
        no_git: bool,
    },
    /// Test, solve and submit the current part of a problem (YYYY/DD).
    Solve { date: ProblemDate },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            report_error(&err);
            exit_codes::FAILURE
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init {
            session,
            branch,
            no_git,
            silent,
        } => cmd_init(InitOptions {
            session,
            branch,
            no_git,
            silent,
        }),
        Command::Setup { date, no_git } => cmd_setup(date, no_git),
        Command::Solve { date } => cmd_solve(date),
    }
}

fn report_error(err: &anyhow::Error) {
    match find_domain_error(err) {
        Some(domain) => eprintln!(
            "{} {domain}",
            format!("{} error:", domain.category()).red().bold()
        ),
        None => eprintln!("{} {err:#}", "error:".red().bold()),
    }
}

fn cmd_init(options: InitOptions) -> Result<()> {
    let mut store = TomlConfigStore::open_default()?;
    let silent = options
        .silent
        .or_else(|| store.get(ConfigKey::SilentOutput).map(|v| v == "true"))
        .unwrap_or(false);
    run_init(&mut store, &options, &Reporter::new(silent))
}

fn load_config() -> Result<EnvironmentConfig> {
    let store = TomlConfigStore::open_default()?;
    Ok(EnvironmentConfig::load(&store)?)
}

fn project_root() -> Result<PathBuf> {
    std::env::current_dir().context("resolve current directory")
}

fn workflow_for(
    config: &EnvironmentConfig,
    root: &Path,
    reporter: Reporter,
) -> RepositoryWorkflow {
    RepositoryWorkflow::new(
        Git::new(root),
        root,
        config.git_default_branch.clone(),
        reporter,
    )
}

fn cmd_setup(date: ProblemDate, no_git: bool) -> Result<()> {
    let config = load_config()?;
    let reporter = Reporter::new(config.silent_output);
    let root = project_root()?;
    let fetcher = HttpFetcher::new(&config.session_cookie, reporter)?;
    let mut prompter = TerminalPrompter;
    let mut scaffolder = Scaffolder::new(&root, reporter).with_prompter(&mut prompter);
    let workflow = (!no_git && !config.no_git).then(|| workflow_for(&config, &root, reporter));

    run_setup(
        &fetcher,
        &mut scaffolder,
        workflow.as_ref(),
        &reporter,
        date.year,
        date.day,
    )?;
    Ok(())
}

fn cmd_solve(date: ProblemDate) -> Result<()> {
    let config = load_config()?;
    let reporter = Reporter::new(config.silent_output);
    let root = project_root()?;
    let fetcher = HttpFetcher::new(&config.session_cookie, reporter)?;
    let registry = solutions::registry();
    let workflow = (!config.no_git).then(|| workflow_for(&config, &root, reporter));

    let mut orchestrator =
        SubmissionOrchestrator::new(&root, &fetcher, &registry, workflow.as_ref(), reporter);
    orchestrator.run(date.year, date.day)?;
    Ok(())
}
