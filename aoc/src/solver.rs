//! Solver contract and the explicit registry of user solutions.
//!
//! Solutions are registered by `(year, day)` in [`crate::solutions::registry`].
//! The registry resolves exactly one factory per problem and guards every
//! invocation so a failing or panicking solution becomes a [`SolverError`].

use std::collections::BTreeMap;
use std::fmt::Display;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::core::error::SolverError;
use crate::core::types::ProblemLevel;

/// What a part returns: `Ok(None)` means "not implemented yet".
pub type SolverOutput = anyhow::Result<Option<Box<dyn Display>>>;

/// Constructs a fresh solver instance.
pub type SolverFactory = fn() -> anyhow::Result<Box<dyn Solver>>;

pub trait Solver {
    fn part_one(&self, input: &str) -> SolverOutput;
    fn part_two(&self, input: &str) -> SolverOutput;
}

/// Wrap a displayable value as a solver result.
pub fn answer<T: Display + 'static>(value: T) -> SolverOutput {
    Ok(Some(Box::new(value)))
}

/// A solved part: rendered answer plus wall time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solved {
    pub answer: String,
    pub elapsed: Duration,
}

#[derive(Default)]
pub struct SolverRegistry {
    factories: BTreeMap<(u16, u8), Vec<SolverFactory>>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, year: u16, day: u8, factory: SolverFactory) -> &mut Self {
        self.factories.entry((year, day)).or_default().push(factory);
        self
    }

    /// Build the solver for a problem.
    pub fn resolve(&self, year: u16, day: u8) -> Result<ResolvedSolver, SolverError> {
        let factories = self
            .factories
            .get(&(year, day))
            .filter(|f| !f.is_empty())
            .ok_or(SolverError::NotFound { year, day })?;
        if factories.len() > 1 {
            return Err(SolverError::Ambiguous {
                year,
                day,
                count: factories.len(),
            });
        }
        let solver = factories[0]().map_err(|err| SolverError::Instantiation {
            year,
            day,
            reason: format!("{err:#}"),
        })?;
        debug!(year, day, "solver resolved");
        Ok(ResolvedSolver { year, day, solver })
    }
}

/// A constructed solver bound to its problem.
pub struct ResolvedSolver {
    year: u16,
    day: u8,
    solver: Box<dyn Solver>,
}

impl ResolvedSolver {
    /// Run one part on `input`, timing it.
    ///
    /// `level` must be `PartOne` or `PartTwo`.
    pub fn solve(&self, level: ProblemLevel, input: &str) -> Result<Solved, SolverError> {
        let part = level.as_str();
        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| match level {
            ProblemLevel::PartOne => self.solver.part_one(input),
            ProblemLevel::PartTwo => self.solver.part_two(input),
            ProblemLevel::Finished => Err(anyhow::anyhow!("no part left to solve")),
        }));
        let elapsed = started.elapsed();

        let runtime = |reason: String| SolverError::Runtime {
            year: self.year,
            day: self.day,
            part,
            reason,
        };
        let value = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => return Err(runtime(format!("{err:#}"))),
            Err(payload) => return Err(runtime(panic_message(payload.as_ref()))),
        };
        let value = value.ok_or(SolverError::NullResult {
            year: self.year,
            day: self.day,
            part,
        })?;
        debug!(part, elapsed_ms = elapsed.as_millis() as u64, "part solved");
        Ok(Solved {
            answer: value.to_string(),
            elapsed,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Solver for Fixed {
        fn part_one(&self, _input: &str) -> SolverOutput {
            answer(42)
        }

        fn part_two(&self, _input: &str) -> SolverOutput {
            Ok(None)
        }
    }

    struct Broken;

    impl Solver for Broken {
        fn part_one(&self, _input: &str) -> SolverOutput {
            anyhow::bail!("bad input")
        }

        fn part_two(&self, _input: &str) -> SolverOutput {
            panic!("boom")
        }
    }

    fn fixed() -> anyhow::Result<Box<dyn Solver>> {
        Ok(Box::new(Fixed))
    }

    fn broken() -> anyhow::Result<Box<dyn Solver>> {
        Ok(Box::new(Broken))
    }

    fn failing_constructor() -> anyhow::Result<Box<dyn Solver>> {
        anyhow::bail!("missing table")
    }

    #[test]
    fn resolve_reports_missing_and_duplicate_solvers() {
        let mut registry = SolverRegistry::new();
        assert_eq!(
            registry.resolve(2023, 5).err(),
            Some(SolverError::NotFound { year: 2023, day: 5 })
        );
        registry.register(2023, 5, fixed).register(2023, 5, fixed);
        assert_eq!(
            registry.resolve(2023, 5).err(),
            Some(SolverError::Ambiguous {
                year: 2023,
                day: 5,
                count: 2
            })
        );
    }

    #[test]
    fn constructor_failure_is_instantiation_error() {
        let mut registry = SolverRegistry::new();
        registry.register(2023, 5, failing_constructor);
        assert!(matches!(
            registry.resolve(2023, 5).err(),
            Some(SolverError::Instantiation { reason, .. }) if reason == "missing table"
        ));
    }

    #[test]
    fn none_is_a_null_result() {
        let mut registry = SolverRegistry::new();
        registry.register(2023, 5, fixed);
        let solver = registry.resolve(2023, 5).expect("resolve");
        assert_eq!(
            solver.solve(ProblemLevel::PartOne, "").expect("solve").answer,
            "42"
        );
        assert_eq!(
            solver.solve(ProblemLevel::PartTwo, "").err(),
            Some(SolverError::NullResult {
                year: 2023,
                day: 5,
                part: "two"
            })
        );
    }

    #[test]
    fn errors_and_panics_are_runtime_errors() {
        let mut registry = SolverRegistry::new();
        registry.register(2023, 5, broken);
        let solver = registry.resolve(2023, 5).expect("resolve");
        assert!(matches!(
            solver.solve(ProblemLevel::PartOne, ""),
            Err(SolverError::Runtime { reason, .. }) if reason == "bad input"
        ));
        assert!(matches!(
            solver.solve(ProblemLevel::PartTwo, ""),
            Err(SolverError::Runtime { reason, .. }) if reason == "panicked: boom"
        ));
    }
}
