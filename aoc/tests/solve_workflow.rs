//! End-to-end `solve` scenarios: ordering, idempotence and the git lifecycle.

use aoc::core::error::{AocError, SolverError, find_domain_error};
use aoc::core::types::ProblemLevel;
use aoc::io::console::Reporter;
use aoc::io::git::MergeResult;
use aoc::io::scaffold::Scaffolder;
use aoc::setup::run_setup;
use aoc::solve::{SolveOutcome, SolveStage, SubmissionOrchestrator};
use aoc::test_support::{
    ScriptedFetcher, TestRepo, correct_answer_page, problem_page, sum_registry,
    unfinished_registry, wrong_answer_page, write_fixture,
};
use aoc::workflow::{AdvanceOutcome, RepositoryWorkflow};

const INPUT: &str = "1,2,3\n";

fn part_one_page() -> String {
    problem_page(&["<p>Sum them.</p>"], &[], Some("1"))
}

fn part_two_page() -> String {
    problem_page(&["<p>Sum them.</p>", "<p>Multiply them.</p>"], &["6"], Some("2"))
}

fn finished_page() -> String {
    problem_page(&["<p>Sum them.</p>", "<p>Multiply them.</p>"], &["6", "6"], None)
}

fn workflow(repo: &TestRepo) -> RepositoryWorkflow {
    RepositoryWorkflow::new(repo.git(), repo.path(), "main", Reporter::new(true))
}

fn set_up(repo: &TestRepo, flow: &RepositoryWorkflow) {
    let fetcher = ScriptedFetcher::new()
        .with_page(part_one_page())
        .with_input(INPUT);
    let mut scaffolder = Scaffolder::new(repo.path(), Reporter::new(true));
    run_setup(&fetcher, &mut scaffolder, Some(flow), &Reporter::new(true), 2023, 1)
        .expect("setup");
}

#[test]
fn solving_both_parts_commits_then_merges() {
    let repo = TestRepo::new("main").expect("repo");
    let flow = workflow(&repo);
    set_up(&repo, &flow);
    let registry = sum_registry(2023, 1);

    let fetcher = ScriptedFetcher::new()
        .with_page(part_one_page())
        .with_page(part_two_page())
        .with_input(INPUT)
        .with_response(correct_answer_page(None));
    let outcome = SubmissionOrchestrator::new(
        repo.path(),
        &fetcher,
        &registry,
        Some(&flow),
        Reporter::new(true),
    )
    .run(2023, 1)
    .expect("part one");
    assert!(matches!(
        outcome,
        SolveOutcome::Correct {
            level: ProblemLevel::PartTwo,
            git: Some(AdvanceOutcome::Committed),
            ..
        }
    ));
    assert_eq!(repo.current_branch(), "problem/2023/day/01");
    assert_eq!(repo.last_commit_message(), "Solve part one for Y2023D1");
    assert!(repo.path().join("2023/Day01/test/answer_part_one.aoc").is_file());

    let fetcher = ScriptedFetcher::new()
        .with_page(part_two_page())
        .with_page(finished_page())
        .with_input(INPUT)
        .with_response(correct_answer_page(Some(1)));
    let outcome = SubmissionOrchestrator::new(
        repo.path(),
        &fetcher,
        &registry,
        Some(&flow),
        Reporter::new(true),
    )
    .run(2023, 1)
    .expect("part two");
    match outcome {
        SolveOutcome::Correct {
            response,
            level,
            git,
        } => {
            assert_eq!(level, ProblemLevel::Finished);
            assert_eq!(git, Some(AdvanceOutcome::Merged(MergeResult::FastForward)));
            assert_eq!(
                response.message,
                "That's the right answer! You have completed Day 1!"
            );
        }
        other => panic!("expected correct answer, got {other:?}"),
    }
    assert_eq!(fetcher.submissions()[0].level, ProblemLevel::PartTwo);
    assert_eq!(fetcher.submissions()[0].answer, "6");
    assert_eq!(repo.current_branch(), "main");
    assert_eq!(repo.last_commit_message(), "Solve part two for Y2023D1");
    assert_eq!(repo.rev("main"), repo.rev("problem/2023/day/01"));
    assert!(repo.is_clean());
}

#[test]
fn wrong_answer_changes_nothing() {
    let repo = TestRepo::new("main").expect("repo");
    let flow = workflow(&repo);
    set_up(&repo, &flow);
    let head = repo.rev("HEAD");
    let registry = sum_registry(2023, 1);

    let fetcher = ScriptedFetcher::new()
        .with_page(part_one_page())
        .with_input(INPUT)
        .with_response(wrong_answer_page(
            "That's not the right answer.  Please wait one minute before trying again. [Return to Day 1]",
        ));
    let mut orchestrator = SubmissionOrchestrator::new(
        repo.path(),
        &fetcher,
        &registry,
        Some(&flow),
        Reporter::new(true),
    );
    let outcome = orchestrator.run(2023, 1).expect("solve");

    match outcome {
        SolveOutcome::Incorrect(response) => {
            assert_eq!(response.highlights, vec!["one minute".to_string()]);
        }
        other => panic!("expected incorrect answer, got {other:?}"),
    }
    assert_eq!(orchestrator.stage(), SolveStage::Submitted);
    assert_eq!(fetcher.calls(), vec!["page", "input", "submit"]);
    assert_eq!(repo.rev("HEAD"), head);
    assert!(repo.is_clean());
    assert!(!repo.path().join("2023/Day01/test/answer_part_one.aoc").exists());
}

#[test]
fn finished_problem_is_not_submitted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let registry = sum_registry(2023, 1);
    let fetcher = ScriptedFetcher::new()
        .with_page(finished_page())
        .with_input(INPUT);

    let outcome = SubmissionOrchestrator::new(
        temp.path(),
        &fetcher,
        &registry,
        None,
        Reporter::new(true),
    )
    .run(2023, 1)
    .expect("solve");

    assert_eq!(outcome, SolveOutcome::AlreadySolved);
    assert!(fetcher.submissions().is_empty());
}

#[test]
fn answer_is_submitted_only_after_fixtures_pass() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path(), 2023, 1, "sample.aoc", "Part: one\nInput:\n1,2,3\nOutput:\n6\n");
    let registry = sum_registry(2023, 1);
    let fetcher = ScriptedFetcher::new()
        .with_page(part_one_page())
        .with_page(part_two_page())
        .with_input(INPUT)
        .with_response(correct_answer_page(None));

    let mut orchestrator = SubmissionOrchestrator::new(
        temp.path(),
        &fetcher,
        &registry,
        None,
        Reporter::new(true),
    );
    orchestrator.run(2023, 1).expect("solve");

    assert_eq!(
        fetcher.calls(),
        vec!["page", "input", "submit", "page", "input"]
    );
    assert_eq!(orchestrator.stage(), SolveStage::FilesUpdated);
}

#[test]
fn null_result_is_an_error_and_nothing_is_submitted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let registry = unfinished_registry(2023, 1);
    let fetcher = ScriptedFetcher::new()
        .with_page(part_one_page())
        .with_input(INPUT);

    let err = SubmissionOrchestrator::new(
        temp.path(),
        &fetcher,
        &registry,
        None,
        Reporter::new(true),
    )
    .run(2023, 1)
    .unwrap_err();

    assert_eq!(
        find_domain_error(&err),
        Some(AocError::Solver(SolverError::NullResult {
            year: 2023,
            day: 1,
            part: "one"
        }))
    );
    assert!(fetcher.submissions().is_empty());
}
