//! SMT backend on the Z3 optimiser (`z3-solver` feature).
//!
//! The model is passed over as stated: one integer per node, an
//! if-then-else count per partition for capacity, and an if-then-else sum
//! over the edges as the objective. The budget is also set as Z3's own
//! `timeout` parameter so the solver stops by itself.

use std::time::Duration;

use z3::ast::{Ast, Int};
use z3::{Config, Context, Optimize, Params, SatResult};

use super::{CutModel, ExactOptimizer};
use crate::partitioning::PartitionId;
use crate::partitioning::error::SolveFailure;

/// Z3 exact backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Z3Optimizer;

fn sum<'ctx>(ctx: &'ctx Context, terms: &[Int<'ctx>]) -> Int<'ctx> {
    if terms.is_empty() {
        return Int::from_u64(ctx, 0);
    }
    let refs: Vec<&Int<'ctx>> = terms.iter().collect();
    Int::add(ctx, &refs)
}

impl ExactOptimizer for Z3Optimizer {
    fn name(&self) -> &str {
        "z3"
    }

    fn solve(
        &self,
        model: &CutModel,
        budget: Option<Duration>,
    ) -> Result<Vec<PartitionId>, SolveFailure> {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let opt = Optimize::new(&ctx);
        if let Some(budget) = budget {
            let mut params = Params::new(&ctx);
            params.set_u32("timeout", u32::try_from(budget.as_millis()).unwrap_or(u32::MAX));
            opt.set_params(&params);
        }

        let zero = Int::from_u64(&ctx, 0);
        let one = Int::from_u64(&ctx, 1);
        let parts = Int::from_u64(&ctx, model.num_partitions as u64);
        let cap = Int::from_u64(&ctx, model.max_per_partition as u64);

        let xs: Vec<Int> = (0..model.num_nodes)
            .map(|i| Int::new_const(&ctx, format!("node_{i}")))
            .collect();
        for x in &xs {
            opt.assert(&x.ge(&zero));
            opt.assert(&x.lt(&parts));
        }
        for p in 0..model.num_partitions {
            let label = Int::from_u64(&ctx, p as u64);
            let members: Vec<Int> = xs.iter().map(|x| x._eq(&label).ite(&one, &zero)).collect();
            opt.assert(&sum(&ctx, &members).le(&cap));
        }
        if let Some((v, p)) = model.pin {
            let x = xs.get(v).ok_or(SolveFailure::Unsatisfiable)?;
            opt.assert(&x._eq(&Int::from_u64(&ctx, p as u64)));
        }

        let cuts: Vec<Int> = model
            .edges
            .iter()
            .map(|&(i, j)| xs[i]._eq(&xs[j]).ite(&zero, &one))
            .collect();
        opt.minimize(&sum(&ctx, &cuts));

        match opt.check(&[]) {
            SatResult::Sat => {
                let solved = opt
                    .get_model()
                    .ok_or_else(|| SolveFailure::Solver("sat without a model".into()))?;
                xs.iter()
                    .enumerate()
                    .map(|(i, x)| {
                        solved
                            .eval(x, true)
                            .and_then(|val| val.as_u64())
                            .map(|val| val as PartitionId)
                            .ok_or_else(|| {
                                SolveFailure::InconsistentModel(format!("node {i} has no value"))
                            })
                    })
                    .collect()
            }
            SatResult::Unsat => Err(SolveFailure::Unsatisfiable),
            SatResult::Unknown => {
                let reason = opt
                    .get_reason_unknown()
                    .unwrap_or_else(|| "unknown".to_string());
                match budget {
                    Some(budget) if reason.contains("timeout") || reason.contains("canceled") => {
                        Err(SolveFailure::TimedOut { budget })
                    }
                    _ => Err(SolveFailure::Solver(reason)),
                }
            }
        }
    }
}
