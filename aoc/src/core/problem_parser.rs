//! Turns a fetched problem page into a [`Problem`] snapshot.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::core::document::{Document, static_selector};
use crate::core::error::ParseError;
use crate::core::types::{Problem, ProblemAnswers, ProblemLevel};

/// Site root used to absolutize host-relative links.
pub const SITE_URL: &str = "https://adventofcode.com";

static LEVEL_INPUT: LazyLock<Selector> = LazyLock::new(|| static_selector("form input"));
static MAIN_ARTICLE: LazyLock<Selector> = LazyLock::new(|| static_selector("main article"));
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| static_selector("article"));
static CODE: LazyLock<Selector> = LazyLock::new(|| static_selector("code"));

static EM_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<em(\s|>)").unwrap());
static RELATIVE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(href|src)="/([^/"][^"]*)?""#).unwrap());

/// Parse a problem page and its raw input into a snapshot.
pub fn parse_problem(
    year: u16,
    day: u8,
    page_html: &str,
    raw_input: &str,
) -> Result<Problem, ParseError> {
    let doc = Document::parse(page_html);
    let level = parse_level(&doc)?;
    let answers = parse_answers(&doc)?;
    let content = parse_content_markdown(&doc);
    Problem::new(year, day, level, normalize_input(raw_input), answers, content)
}

/// Level from the first form input's `value` attribute.
pub fn parse_level(doc: &Document) -> Result<ProblemLevel, ParseError> {
    let value = doc.select_first(&LEVEL_INPUT).and_then(|node| node.attr("value"));
    match value {
        Some("1") => Ok(ProblemLevel::PartOne),
        Some("2") => Ok(ProblemLevel::PartTwo),
        None => Ok(ProblemLevel::Finished),
        Some(other) => Err(ParseError::InvalidLevel(other.to_string())),
    }
}

/// Revealed answers: the code span of the paragraph following each article.
pub fn parse_answers(doc: &Document) -> Result<ProblemAnswers, ParseError> {
    let articles = doc.select_all(&MAIN_ARTICLE);
    if articles.is_empty() {
        return Err(ParseError::ContentNodeMissing);
    }
    let answers = articles
        .iter()
        .filter_map(|article| article.following_sibling("p"))
        .filter_map(|p| p.select_first(&CODE))
        .map(|code| code.inner_text().trim().to_string())
        .take(2);
    Ok(ProblemAnswers::from_ordered(answers))
}

/// Concatenated article markup with emphasis and links normalized.
pub fn parse_content_markdown(doc: &Document) -> String {
    doc.select_all(&ARTICLE)
        .iter()
        .map(|article| rewrite_markup(&article.inner_html()))
        .collect()
}

fn rewrite_markup(html: &str) -> String {
    let strong = EM_OPEN
        .replace_all(html, "<strong$1")
        .replace("</em>", "</strong>");
    RELATIVE_LINK
        .replace_all(&strong, format!(r#"$1="{SITE_URL}/$2""#).as_str())
        .into_owned()
}

/// Normalize line endings to the host convention and trim.
pub fn normalize_input(raw: &str) -> String {
    let unix = raw.replace("\r\n", "\n");
    let trimmed = unix.trim();
    if cfg!(windows) {
        trimmed.replace('\n', "\r\n")
    } else {
        trimmed.to_string()
    }
}
