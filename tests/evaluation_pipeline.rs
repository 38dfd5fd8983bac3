use std::thread;
use std::time::Duration;

use dpu_partition::config::EvalConfig;
use dpu_partition::evaluation::{ReportStatus, run_evaluation, run_evaluation_with};
use dpu_partition::partitioning::{
    CutModel, ExactOptimizer, ExactPartitioner, GreedyAffinity, PartitionId, PartitionStrategy,
    RandomCapacity,
};
use dpu_partition::{PartitionError, SolveFailure};

/// Never answers inside any sensible budget.
struct Stalls;

impl ExactOptimizer for Stalls {
    fn name(&self) -> &str {
        "stalls"
    }
    fn solve(
        &self,
        model: &CutModel,
        _budget: Option<Duration>,
    ) -> Result<Vec<PartitionId>, SolveFailure> {
        thread::sleep(Duration::from_millis(400));
        Ok(vec![0; model.num_nodes])
    }
}

fn small_config() -> EvalConfig {
    EvalConfig {
        num_nodes: 8,
        num_partitions: 3,
        max_per_partition: 3,
        max_out_degree: Some(3),
        ..Default::default()
    }
}

#[test]
fn every_default_strategy_reports() {
    let cfg = small_config();
    let run = run_evaluation(&cfg).unwrap();
    assert_eq!(run.path[0], cfg.start_node);
    let names: Vec<_> = run.reports.iter().map(|r| r.strategy.as_str()).collect();
    assert_eq!(names, ["random-capacity", "greedy-affinity", "exact-milp"]);
    for r in &run.reports {
        let s = r.outcome.as_ref().unwrap();
        s.assignment.validate(cfg.num_nodes, cfg.max_per_partition).unwrap();
        assert!(s.score <= run.path.len().saturating_sub(1));
    }
    let exact_cut = run.reports[2].outcome.as_ref().unwrap().edge_cut;
    assert!(run.reports.iter().all(|r| r.outcome.as_ref().unwrap().edge_cut >= exact_cut));
    assert!(run.best().is_some());
}

#[test]
fn runs_are_reproducible() {
    let mut cfg = small_config();
    cfg.exact.enabled = false;
    let a = run_evaluation(&cfg).unwrap();
    let b = run_evaluation(&cfg).unwrap();
    assert_eq!(a.graph, b.graph);
    assert_eq!(a.path, b.path);
    assert_eq!(a.summaries().len(), b.summaries().len());
    for (x, y) in a.reports.iter().zip(&b.reports) {
        assert_eq!(x.outcome, y.outcome);
    }
}

#[test]
fn solver_timeout_is_reported_not_fatal() {
    let cfg = small_config();
    let strategies: Vec<Box<dyn PartitionStrategy>> = vec![
        Box::new(GreedyAffinity::new()),
        Box::new(ExactPartitioner::new(Stalls).time_budget(Some(Duration::from_millis(30)))),
        Box::new(RandomCapacity::new(cfg.rng_seed)),
    ];
    let run = run_evaluation_with(&cfg, &strategies).unwrap();

    let stalled = &run.reports[1];
    assert_eq!(stalled.strategy, "exact-stalls");
    assert_eq!(
        stalled.outcome,
        Err(PartitionError::NoSolutionFound(SolveFailure::TimedOut {
            budget: Duration::from_millis(30)
        }))
    );
    let summary = stalled.summary();
    assert_eq!(summary.status, ReportStatus::Failed);
    assert!(summary.error.unwrap().contains("time budget"));

    assert!(run.reports[0].is_ok());
    assert!(run.reports[2].is_ok());
}

#[test]
fn startup_errors_are_fatal() {
    let cfg = EvalConfig {
        num_nodes: 10,
        num_partitions: 3,
        max_per_partition: 3,
        ..Default::default()
    };
    assert_eq!(
        run_evaluation(&cfg).unwrap_err(),
        PartitionError::CapacityInfeasible {
            num_nodes: 10,
            num_partitions: 3,
            max_per_partition: 3
        }
    );

    let cfg = EvalConfig {
        start_node: 12,
        ..small_config()
    };
    assert!(matches!(
        run_evaluation(&cfg),
        Err(PartitionError::OutOfRangeNode { node: 12, .. })
    ));
}
