//! User-facing terminal output.
//!
//! Diagnostics go through `tracing`; this is the product output the user
//! reads. Silent mode hides info and success lines but never warnings or
//! errors.

use std::time::Duration;

use colored::{ColoredString, Colorize};

use crate::core::timing::TimingBand;

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    silent: bool,
}

impl Reporter {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn info(&self, message: &str) {
        if !self.silent {
            println!("{message}");
        }
    }

    pub fn success(&self, message: &str) {
        if !self.silent {
            println!("{} {message}", "Success:".green().bold());
        }
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {message}", "Warning:".yellow().bold());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "Error:".red().bold());
    }

    /// Print a verdict line regardless of silent mode.
    pub fn verdict(&self, message: &str) {
        println!("{message}");
    }
}

/// Highlight value for terminal output.
pub fn emphasize(value: &str) -> ColoredString {
    value.blue()
}

/// Elapsed milliseconds colored by severity band.
pub fn elapsed(duration: Duration) -> ColoredString {
    let text = format!("{}ms", duration.as_millis());
    match TimingBand::classify(duration) {
        TimingBand::Normal => text.green(),
        TimingBand::Warning => text.yellow(),
        TimingBand::Severe => text.red(),
    }
}

/// Color each highlighted substring of `message` red.
pub fn highlight(message: &str, highlights: &[String]) -> String {
    highlights.iter().fold(message.to_string(), |acc, part| {
        acc.replacen(part.as_str(), &part.red().to_string(), 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_without_colors_keeps_text() {
        colored::control::set_override(false);
        let out = highlight("Please wait one minute before trying again.", &["one minute".to_string()]);
        assert_eq!(out, "Please wait one minute before trying again.");
    }
}
