//! `YYYY/DD` problem identifiers.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::core::error::ParseError;

pub const FIRST_YEAR: u16 = 2015;
pub const LAST_DAY: u8 = 25;

/// Validated `(year, day)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemDate {
    pub year: u16,
    pub day: u8,
}

impl ProblemDate {
    /// Validate against an explicit latest year (the current one in production).
    pub fn parse_with_latest_year(raw: &str, latest_year: u16) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidDate(raw.to_string(), reason.to_string());

        let (year, day) = raw
            .split_once('/')
            .ok_or_else(|| invalid("expected YYYY/DD"))?;
        if year.len() != 4 || !(1..=2).contains(&day.len()) {
            return Err(invalid("expected YYYY/DD"));
        }
        let year: u16 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let day: u8 = day.parse().map_err(|_| invalid("day is not a number"))?;

        if !(FIRST_YEAR..=latest_year).contains(&year) {
            return Err(invalid(&format!(
                "year must be between {FIRST_YEAR} and {latest_year}"
            )));
        }
        if !(1..=LAST_DAY).contains(&day) {
            return Err(invalid(&format!("day must be between 1 and {LAST_DAY}")));
        }
        Ok(Self { year, day })
    }
}

impl FromStr for ProblemDate {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let current = u16::try_from(chrono::Local::now().year()).unwrap_or(u16::MAX);
        Self::parse_with_latest_year(raw, current)
    }
}

impl fmt::Display for ProblemDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.day)
    }
}
