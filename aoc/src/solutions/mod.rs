//! Registered puzzle solutions.
//!
//! Add a module per problem and register it below; `aoc setup` writes a stub
//! to start from.

use crate::solver::SolverRegistry;

mod y2015d01;

pub fn registry() -> SolverRegistry {
    let mut registry = SolverRegistry::new();
    registry.register(2015, 1, || Ok(Box::new(y2015d01::Y2015D01)));
    registry
}
