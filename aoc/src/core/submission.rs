//! Interpretation of the answer endpoint's HTML response.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::core::document::{Document, static_selector};

const SUCCESS_CLASS: &str = "day-success";
const SUCCESS_MESSAGE: &str = "That's the right answer!";
const UNKNOWN_ERROR: &str = "Unknown error!";

static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| static_selector("article p"));
static DAY_COMPLETE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"You have completed Day \d+!").unwrap());
static PLEASE_WAIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Pp]lease wait (.*?) before trying again").unwrap());
static LEFT_TO_WAIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"have ([^.]*?) left to wait").unwrap());
static DOUBLE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Parsed submission response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResponse {
    pub correct: bool,
    /// Plain message, ready to print.
    pub message: String,
    /// Substrings of `message` worth highlighting (wait times).
    pub highlights: Vec<String>,
}

pub fn parse_submission_response(html: &str) -> SubmissionResponse {
    let doc = Document::parse(html);
    let paragraphs = doc.select_all(&PARAGRAPHS);
    let first = paragraphs.first();

    if first.is_some_and(|p| p.contains_class(SUCCESS_CLASS)) {
        let mut message = SUCCESS_MESSAGE.to_string();
        let completed = paragraphs
            .get(1)
            .map(|p| p.inner_text())
            .and_then(|text| DAY_COMPLETE.find(&text).map(|m| m.as_str().to_string()));
        if let Some(completed) = completed {
            message.push(' ');
            message.push_str(&completed);
        }
        return SubmissionResponse {
            correct: true,
            message: collapse_spaces(&message),
            highlights: Vec::new(),
        };
    }

    // Drop the trailing "[Return to Day N]" link.
    let message = first
        .map(|p| p.inner_text())
        .and_then(|text| text.split('[').next().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    let message = collapse_spaces(&message);

    let highlights = [&*PLEASE_WAIT, &*LEFT_TO_WAIT]
        .iter()
        .filter_map(|re| re.captures(&message))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .filter(|s| !s.is_empty())
        .collect();

    SubmissionResponse {
        correct: false,
        message,
        highlights,
    }
}

fn collapse_spaces(text: &str) -> String {
    DOUBLE_SPACE.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{correct_answer_page, wrong_answer_page};

    #[test]
    fn success_with_completed_day() {
        let response = parse_submission_response(&correct_answer_page(Some(5)));
        assert!(response.correct);
        assert_eq!(
            response.message,
            "That's the right answer! You have completed Day 5!"
        );
    }

    #[test]
    fn success_without_completion_paragraph() {
        let response = parse_submission_response(&correct_answer_page(None));
        assert!(response.correct);
        assert_eq!(response.message, "That's the right answer!");
    }

    #[test]
    fn wrong_answer_strips_return_link_and_highlights_wait() {
        let response = parse_submission_response(&wrong_answer_page(
            "That's not the right answer.  If you're stuck, make sure you're using the full input data. Please wait one minute before trying again. [Return to Day 5]",
        ));
        assert!(!response.correct);
        assert_eq!(
            response.message,
            "That's not the right answer. If you're stuck, make sure you're using the full input data. Please wait one minute before trying again."
        );
        assert_eq!(response.highlights, vec!["one minute".to_string()]);
    }

    #[test]
    fn rate_limited_answer_highlights_remaining_time() {
        let response = parse_submission_response(&wrong_answer_page(
            "You gave an answer too recently; you have to wait after submitting an answer before trying again.  You have 34s left to wait. [Return to Day 5]",
        ));
        assert!(!response.correct);
        assert_eq!(response.highlights, vec!["34s".to_string()]);
    }

    #[test]
    fn empty_response_is_unknown_error() {
        let response = parse_submission_response("<html><body></body></html>");
        assert!(!response.correct);
        assert_eq!(response.message, "Unknown error!");
    }
}
