//! Side-by-side comparison of partition strategies.
//!
//! One run generates a network, walks it, then hands the same read-only
//! graph and path to every strategy. A strategy that fails is reported with
//! its error; the others still run and are scored.

use std::time::{Duration, Instant};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::Serialize;

use crate::algs::generate::NetworkGenerator;
use crate::algs::traversal::bfs_walk;
use crate::config::EvalConfig;
use crate::graph::{Graph, NodeId};
use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::PartitionableGraph;
use crate::partitioning::metrics::{edge_cut, evaluate, partition_loads};
use crate::partitioning::{
    Capacity, ExactPartitioner, GreedyAffinity, MilpOptimizer, PartitionAssignment,
    PartitionStrategy, RandomCapacity,
};

/// A validated assignment with its scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAssignment {
    pub assignment: PartitionAssignment,
    /// Boundary crossings along the path.
    pub score: usize,
    /// Directed cut edges over the whole graph.
    pub edge_cut: usize,
}

/// Result of one strategy in a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReport {
    pub strategy: String,
    pub elapsed: Duration,
    pub outcome: Result<ScoredAssignment, PartitionError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Ok,
    Failed,
}

/// Flat, serializable view of a [`StrategyReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub strategy: String,
    pub status: ReportStatus,
    pub score: Option<usize>,
    pub edge_cut: Option<usize>,
    pub loads: Option<Vec<usize>>,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

impl StrategyReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn score(&self) -> Option<usize> {
        self.outcome.as_ref().ok().map(|s| s.score)
    }

    pub fn summary(&self) -> ReportSummary {
        let elapsed_ms = u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX);
        match &self.outcome {
            Ok(s) => ReportSummary {
                strategy: self.strategy.clone(),
                status: ReportStatus::Ok,
                score: Some(s.score),
                edge_cut: Some(s.edge_cut),
                loads: Some(partition_loads(&s.assignment)),
                elapsed_ms,
                error: None,
            },
            Err(e) => ReportSummary {
                strategy: self.strategy.clone(),
                status: ReportStatus::Failed,
                score: None,
                edge_cut: None,
                loads: None,
                elapsed_ms,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Everything one evaluation run produced.
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    pub graph: Graph,
    pub path: Vec<NodeId>,
    pub reports: Vec<StrategyReport>,
}

impl EvaluationRun {
    pub fn summaries(&self) -> Vec<ReportSummary> {
        self.reports.iter().map(StrategyReport::summary).collect()
    }

    /// Lowest-scoring successful strategy; ties go to the earlier one.
    pub fn best(&self) -> Option<&StrategyReport> {
        self.reports
            .iter()
            .filter_map(|r| r.score().map(|s| (s, r)))
            .min_by_key(|&(s, _)| s)
            .map(|(_, r)| r)
    }
}

fn run_strategy(
    strategy: &dyn PartitionStrategy,
    graph: &dyn PartitionableGraph,
    path: &[NodeId],
    capacity: Capacity,
) -> StrategyReport {
    let name = strategy.name().to_string();
    log::info!("running {name}");
    let started = Instant::now();
    let outcome = strategy.partition(graph, capacity).and_then(|assignment| {
        assignment.validate(graph.num_vertices(), capacity.max_per_partition)?;
        let score = evaluate(&assignment, path)?;
        let edge_cut = edge_cut(graph, &assignment)?;
        Ok(ScoredAssignment {
            assignment,
            score,
            edge_cut,
        })
    });
    let elapsed = started.elapsed();
    match &outcome {
        Ok(s) => log::info!(
            "{name}: score {} (edge cut {}) in {elapsed:?}",
            s.score,
            s.edge_cut
        ),
        Err(e) if e.is_strategy_local() => log::warn!("{name} failed: {e}"),
        Err(e) => log::error!("{name} failed: {e}"),
    }
    StrategyReport {
        strategy: name,
        elapsed,
        outcome,
    }
}

/// Runs every strategy on the same graph and path, keeping input order.
///
/// Failures never stop the comparison; each is recorded in its own report.
pub fn compare_strategies(
    graph: &dyn PartitionableGraph,
    path: &[NodeId],
    capacity: Capacity,
    strategies: &[Box<dyn PartitionStrategy>],
) -> Vec<StrategyReport> {
    #[cfg(feature = "rayon")]
    {
        strategies
            .par_iter()
            .map(|s| run_strategy(s.as_ref(), graph, path, capacity))
            .collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        strategies
            .iter()
            .map(|s| run_strategy(s.as_ref(), graph, path, capacity))
            .collect()
    }
}

/// Random, greedy, and (when enabled) exact, as configured.
pub fn default_strategies(config: &EvalConfig) -> Vec<Box<dyn PartitionStrategy>> {
    let mut strategies: Vec<Box<dyn PartitionStrategy>> = vec![
        Box::new(RandomCapacity::new(config.rng_seed)),
        Box::new(GreedyAffinity::new()),
    ];
    if config.exact.enabled {
        strategies.push(Box::new(
            ExactPartitioner::new(MilpOptimizer)
                .pin_first_to_zero(config.exact.pin_first_to_zero)
                .time_budget(config.exact.time_budget()),
        ));
    }
    strategies
}

/// Validates `config`, builds the network and path, and compares the
/// configured strategies.
///
/// # Errors
/// Only startup failures: invalid constants, capacity shortfall, or a start
/// node outside the network. Strategy failures land in the reports.
pub fn run_evaluation(config: &EvalConfig) -> Result<EvaluationRun, PartitionError> {
    run_evaluation_with(config, &default_strategies(config))
}

/// [`run_evaluation`] with a caller-chosen strategy set.
pub fn run_evaluation_with(
    config: &EvalConfig,
    strategies: &[Box<dyn PartitionStrategy>],
) -> Result<EvaluationRun, PartitionError> {
    config.validate()?;
    let graph = NetworkGenerator::new(config.num_nodes, config.graph_seed)
        .max_out_degree(config.max_out_degree)
        .generate()?;
    let path = bfs_walk(&graph, config.start_node, config.max_depth)?;
    log::info!(
        "network of {} nodes and {} edges; path of {} nodes from {}",
        graph.num_nodes(),
        graph.num_edges()?,
        path.len(),
        config.start_node
    );
    let reports = compare_strategies(&graph, &path, config.capacity(), strategies);
    Ok(EvaluationRun {
        graph,
        path,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain4() -> Graph {
        Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn failures_stay_per_strategy() {
        let g = chain4();
        let strategies: Vec<Box<dyn PartitionStrategy>> = vec![
            Box::new(GreedyAffinity::new()),
            Box::new(RandomCapacity::new(1)),
        ];
        let reports = compare_strategies(&g, &[0, 1, 2, 3], Capacity::new(1, 3), &strategies);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| !r.is_ok()));
        let summary = reports[0].summary();
        assert_eq!(summary.strategy, "greedy-affinity");
        assert_eq!(summary.status, ReportStatus::Failed);
        assert!(summary.error.is_some());
        assert_eq!(summary.score, None);
    }

    #[test]
    fn greedy_scores_chain() {
        let g = chain4();
        let strategies: Vec<Box<dyn PartitionStrategy>> = vec![Box::new(GreedyAffinity::new())];
        let reports = compare_strategies(&g, &[0, 1, 2, 3], Capacity::new(2, 2), &strategies);
        let s = reports[0].outcome.as_ref().unwrap();
        assert_eq!(s.score, 1);
        assert_eq!(s.edge_cut, 1);
        assert_eq!(reports[0].summary().loads, Some(vec![2, 2]));
    }

    #[test]
    fn default_set_follows_config() {
        let mut cfg = EvalConfig::default();
        let names: Vec<String> = default_strategies(&cfg)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["random-capacity", "greedy-affinity", "exact-milp"]);
        cfg.exact.enabled = false;
        assert_eq!(default_strategies(&cfg).len(), 2);
    }

    #[test]
    fn summary_serializes() {
        let report = StrategyReport {
            strategy: "greedy-affinity".into(),
            elapsed: Duration::from_millis(3),
            outcome: Err(PartitionError::Infeasible {
                strategy: "greedy-affinity",
                node: 0,
            }),
        };
        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["elapsed_ms"], 3);
        assert!(json["score"].is_null());
    }
}
