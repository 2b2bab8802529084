//! Canonical problem model shared by the parser, the test runner and the
//! submission workflow.
//!
//! These types are plain values with no I/O. A [`Problem`] is rebuilt from a
//! fresh page on every fetch and never mutated afterwards.

use std::fmt;

use crate::core::error::ParseError;

/// Which part of a two-part puzzle is still unsolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProblemLevel {
    PartOne,
    PartTwo,
    Finished,
}

impl ProblemLevel {
    /// Form value expected by the answer endpoint (`None` once finished).
    pub fn submit_value(self) -> Option<&'static str> {
        match self {
            Self::PartOne => Some("1"),
            Self::PartTwo => Some("2"),
            Self::Finished => None,
        }
    }

    /// Word used in fixtures and user-facing messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PartOne => "one",
            Self::PartTwo => "two",
            Self::Finished => "finished",
        }
    }

    /// Level implied by the number of revealed answers.
    pub fn from_answer_count(count: usize) -> Option<Self> {
        match count {
            0 => Some(Self::PartOne),
            1 => Some(Self::PartTwo),
            2 => Some(Self::Finished),
            _ => None,
        }
    }
}

impl fmt::Display for ProblemLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Revealed correct answers, part one first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemAnswers {
    pub part_one: Option<String>,
    pub part_two: Option<String>,
}

impl ProblemAnswers {
    /// Build from answers in document order; anything past the second is ignored.
    pub fn from_ordered<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut iter = answers.into_iter();
        Self {
            part_one: iter.next(),
            part_two: iter.next(),
        }
    }

    pub fn count(&self) -> usize {
        usize::from(self.part_one.is_some()) + usize::from(self.part_two.is_some())
    }

    /// `(level, answer)` pairs for every revealed answer.
    pub fn revealed(&self) -> Vec<(ProblemLevel, &str)> {
        let mut out = Vec::new();
        if let Some(answer) = &self.part_one {
            out.push((ProblemLevel::PartOne, answer.as_str()));
        }
        if let Some(answer) = &self.part_two {
            out.push((ProblemLevel::PartTwo, answer.as_str()));
        }
        out
    }
}

/// Immutable snapshot of one puzzle instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    year: u16,
    day: u8,
    level: ProblemLevel,
    input: String,
    answers: ProblemAnswers,
    content_markdown: String,
}

impl Problem {
    /// Build a snapshot, rejecting a level that disagrees with the answers.
    pub fn new(
        year: u16,
        day: u8,
        level: ProblemLevel,
        input: String,
        answers: ProblemAnswers,
        content_markdown: String,
    ) -> Result<Self, ParseError> {
        let consistent = answers.part_two.is_none() || answers.part_one.is_some();
        if !consistent || ProblemLevel::from_answer_count(answers.count()) != Some(level) {
            return Err(ParseError::LevelAnswerMismatch {
                level: level.as_str(),
                answers: answers.count(),
            });
        }
        Ok(Self {
            year,
            day,
            level,
            input,
            answers,
            content_markdown,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn level(&self) -> ProblemLevel {
        self.level
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn answers(&self) -> &ProblemAnswers {
        &self.answers
    }

    pub fn content_markdown(&self) -> &str {
        &self.content_markdown
    }
}

/// One fixture: input and expected output for a single part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemTestCase {
    /// Never `Finished`.
    pub level: ProblemLevel,
    pub input: String,
    pub expected_output: String,
}
