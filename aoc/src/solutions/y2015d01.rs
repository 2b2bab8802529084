//! Y2015D1: Not Quite Lisp.

use anyhow::bail;

use crate::solver::{Solver, SolverOutput, answer};

pub struct Y2015D01;

fn steps(input: &str) -> impl Iterator<Item = anyhow::Result<i64>> + '_ {
    input.trim().chars().map(|c| match c {
        '(' => Ok(1),
        ')' => Ok(-1),
        other => bail!("unexpected character `{other}`"),
    })
}

impl Solver for Y2015D01 {
    fn part_one(&self, input: &str) -> SolverOutput {
        let floor = steps(input).sum::<anyhow::Result<i64>>()?;
        answer(floor)
    }

    fn part_two(&self, input: &str) -> SolverOutput {
        let mut floor = 0;
        for (position, step) in steps(input).enumerate() {
            floor += step?;
            if floor < 0 {
                return answer(position + 1);
            }
        }
        bail!("never reached the basement")
    }
}
