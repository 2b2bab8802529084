//! Severity bands for per-test elapsed time.

use std::time::Duration;

/// Purely observational; never changes a test verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingBand {
    Normal,
    Warning,
    Severe,
}

impl TimingBand {
    pub fn classify(elapsed: Duration) -> Self {
        match elapsed.as_millis() {
            ms if ms > 1000 => Self::Severe,
            ms if ms > 500 => Self::Warning,
            _ => Self::Normal,
        }
    }
}
