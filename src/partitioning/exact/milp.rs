//! Mixed-integer backend on `good_lp` with the pure-Rust `microlp` solver.
//!
//! The integer labels of [`CutModel`] are encoded one-hot:
//!
//! ```text
//! y[i][p] in {0, 1}                 node i sits on partition p
//! c[e]    in [0, 1]                 edge e = (i, j) is cut
//!
//! sum_p y[i][p]        == 1         every node placed once
//! sum_i y[i][p]        <= C         capacity
//! c[e] >= y[i][p] - y[j][p]         for every p; forces c[e] = 1 when cut
//! minimise sum_e c[e]
//! ```
//!
//! Without a pin other than `x[0] == 0`, node `i` is only offered
//! partitions `0..=i`. Relabelling partitions by their smallest node turns
//! any assignment into one of that shape with the same loads and cost, so
//! the optimum is unchanged while the search space shrinks.

use std::time::Duration;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    constraint, variable,
};

use super::{CutModel, ExactOptimizer};
use crate::partitioning::PartitionId;
use crate::partitioning::error::SolveFailure;

/// Default exact backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilpOptimizer;

impl ExactOptimizer for MilpOptimizer {
    fn name(&self) -> &str {
        "milp"
    }

    fn solve(
        &self,
        model: &CutModel,
        _budget: Option<Duration>,
    ) -> Result<Vec<PartitionId>, SolveFailure> {
        if model.num_nodes == 0 {
            return Ok(Vec::new());
        }
        let relabel = matches!(model.pin, None | Some((0, 0)));
        let offered = |i: usize| {
            if relabel {
                (i + 1).min(model.num_partitions)
            } else {
                model.num_partitions
            }
        };

        let mut vars = ProblemVariables::new();
        let y: Vec<Vec<Variable>> = (0..model.num_nodes)
            .map(|i| (0..offered(i)).map(|_| vars.add(variable().binary())).collect())
            .collect();
        let cut: Vec<Variable> = model
            .edges
            .iter()
            .map(|_| vars.add(variable().min(0.0).max(1.0)))
            .collect();

        let mut objective = Expression::with_capacity(cut.len());
        for &c in &cut {
            objective += c;
        }

        let mut rows: Vec<Constraint> = Vec::new();
        for yi in &y {
            let mut placed = Expression::with_capacity(yi.len());
            for &v in yi {
                placed += v;
            }
            rows.push(constraint!(placed == 1.0));
        }
        let cap = model.max_per_partition as f64;
        for p in 0..model.num_partitions {
            let mut load = Expression::with_capacity(model.num_nodes);
            for yi in &y {
                if let Some(&v) = yi.get(p) {
                    load += v;
                }
            }
            rows.push(constraint!(load <= cap));
        }
        for (&(i, j), &c) in model.edges.iter().zip(&cut) {
            for p in 0..model.num_partitions {
                // y[j][p] absent means 0, which only tightens the row.
                let Some(&yip) = y[i].get(p) else { continue };
                let mut gap = Expression::with_capacity(3);
                gap += c;
                gap -= yip;
                if let Some(&yjp) = y[j].get(p) {
                    gap += yjp;
                }
                rows.push(constraint!(gap >= 0.0));
            }
        }
        if let Some((v, p)) = model.pin {
            match y.get(v).and_then(|yv| yv.get(p)) {
                Some(&pinned) => rows.push(constraint!(pinned == 1.0)),
                None => return Err(SolveFailure::Unsatisfiable),
            }
        }

        log::debug!(
            "milp: {} binaries, {} cut indicators, {} rows",
            y.iter().map(Vec::len).sum::<usize>(),
            cut.len(),
            rows.len()
        );

        let mut problem = vars.minimise(objective).using(microlp);
        for row in rows {
            problem = problem.with(row);
        }
        let solution = problem.solve().map_err(|e| match e {
            ResolutionError::Infeasible => SolveFailure::Unsatisfiable,
            other => SolveFailure::Solver(other.to_string()),
        })?;

        y.iter()
            .enumerate()
            .map(|(i, yi)| {
                yi.iter()
                    .position(|&v| solution.value(v) > 0.5)
                    .ok_or_else(|| {
                        SolveFailure::InconsistentModel(format!(
                            "node {i} has no partition in the solution"
                        ))
                    })
            })
            .collect()
    }
}
