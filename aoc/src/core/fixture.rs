//! Fixture file format (`*.aoc`).
//!
//! ```text
//! Part: one
//! Input:
//! 1,2,3
//! Output:
//! 6
//! ```
//!
//! Headers must appear in this order. Section bodies are trimmed; an empty
//! body or a part marker other than `one`/`two` makes the file invalid.

use std::path::Path;

use crate::core::error::ParseError;
use crate::core::types::{ProblemLevel, ProblemTestCase};

pub const FIXTURE_EXTENSION: &str = "aoc";

const PART_HEADER: &str = "Part:";
const INPUT_HEADER: &str = "Input:";
const OUTPUT_HEADER: &str = "Output:";

/// Blank template written next to the generated fixtures.
pub const FIXTURE_TEMPLATE: &str = "\
Part: [one/two]
Input:
# Your test input goes here
# and also here, if multiline
Output:
# Your expected output goes here
";

/// Parse fixture text. `path` is only used to name the file in errors.
pub fn parse_fixture(path: &Path, contents: &str) -> Result<ProblemTestCase, ParseError> {
    let invalid = |reason: &str| ParseError::InvalidTestFixture {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let part_at = contents
        .find(PART_HEADER)
        .ok_or_else(|| invalid("missing `Part:` section"))?;
    let after_part = part_at + PART_HEADER.len();
    let input_at = contents[after_part..]
        .find(INPUT_HEADER)
        .map(|i| after_part + i)
        .ok_or_else(|| invalid("missing `Input:` section"))?;
    let after_input = input_at + INPUT_HEADER.len();
    // The last `Output:` wins so inputs may mention the word themselves.
    let output_at = contents[after_input..]
        .rfind(OUTPUT_HEADER)
        .map(|i| after_input + i)
        .ok_or_else(|| invalid("missing `Output:` section"))?;

    let part = contents[after_part..input_at].trim();
    let input = contents[after_input..output_at].trim();
    let output = contents[output_at + OUTPUT_HEADER.len()..].trim();

    if part.is_empty() {
        return Err(invalid("empty `Part:` section"));
    }
    if input.is_empty() {
        return Err(invalid("empty `Input:` section"));
    }
    if output.is_empty() {
        return Err(invalid("empty `Output:` section"));
    }

    let level = match part {
        "one" => ProblemLevel::PartOne,
        "two" => ProblemLevel::PartTwo,
        other => return Err(invalid(&format!("unknown part `{other}`, expected one or two"))),
    };

    Ok(ProblemTestCase {
        level,
        input: input.to_string(),
        expected_output: output.to_string(),
    })
}

/// Render a case in the canonical layout understood by [`parse_fixture`].
pub fn render_fixture(case: &ProblemTestCase) -> String {
    format!(
        "{PART_HEADER} {}\n{INPUT_HEADER}\n{}\n{OUTPUT_HEADER}\n{}\n",
        case.level.as_str(),
        case.input.trim(),
        case.expected_output.trim()
    )
}

/// File name for a fixture generated from a revealed answer.
pub fn answer_fixture_name(level: ProblemLevel) -> String {
    format!("answer_part_{}.{FIXTURE_EXTENSION}", level.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("2023/Day05/test/sample.aoc")
    }

    #[test]
    fn parses_sample_fixture() {
        let case = parse_fixture(&path(), "Part: one\nInput:\n1,2,3\nOutput:\n6\n").expect("parse");
        assert_eq!(
            case,
            ProblemTestCase {
                level: ProblemLevel::PartOne,
                input: "1,2,3".to_string(),
                expected_output: "6".to_string(),
            }
        );
    }

    #[test]
    fn rendered_fixture_parses_back() {
        let case = ProblemTestCase {
            level: ProblemLevel::PartTwo,
            input: "line one\nline two".to_string(),
            expected_output: "42".to_string(),
        };
        let parsed = parse_fixture(&path(), &render_fixture(&case)).expect("parse");
        assert_eq!(parsed, case);
    }

    #[test]
    fn missing_output_section_names_file() {
        let err = parse_fixture(&path(), "Part: one\nInput:\n1,2,3\n").unwrap_err();
        let ParseError::InvalidTestFixture { path: p, reason } = err else {
            panic!("expected InvalidTestFixture");
        };
        assert_eq!(p, path());
        assert!(reason.contains("Output:"));
    }

    #[test]
    fn empty_input_section_is_invalid() {
        let err = parse_fixture(&path(), "Part: two\nInput:\n   \nOutput:\n6\n").unwrap_err();
        assert!(err.to_string().contains("empty `Input:`"));
    }

    #[test]
    fn unknown_part_marker_is_invalid() {
        let err = parse_fixture(&path(), FIXTURE_TEMPLATE).unwrap_err();
        assert!(err.to_string().contains("unknown part `[one/two]`"));
    }

    #[test]
    fn answer_fixture_names_are_per_part() {
        assert_eq!(answer_fixture_name(ProblemLevel::PartOne), "answer_part_one.aoc");
        assert_eq!(answer_fixture_name(ProblemLevel::PartTwo), "answer_part_two.aoc");
    }
}
