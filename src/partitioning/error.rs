//! Partitioning errors for dpu-partition

use std::time::Duration;
use thiserror::Error;

use crate::graph::NodeId;

/// Errors from graph queries, partitioners, and the cut-cost evaluator.
///
/// `Infeasible` and `NoSolutionFound` only abort the strategy that raised
/// them; `CapacityInfeasible` and `InvalidConfig` are startup failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// A heuristic could not place `node`: every partition is full.
    #[error("strategy `{strategy}` cannot place node {node}: no partition has remaining capacity")]
    Infeasible { strategy: &'static str, node: NodeId },
    /// The exact partitioner produced no assignment.
    #[error("no solution found: {0}")]
    NoSolutionFound(#[from] SolveFailure),
    /// Global capacity is smaller than the node count.
    #[error(
        "capacity infeasible: {num_partitions} partitions x {max_per_partition} nodes < {num_nodes} nodes"
    )]
    CapacityInfeasible {
        num_nodes: usize,
        num_partitions: usize,
        max_per_partition: usize,
    },
    /// A node id outside `[0, num_nodes)` was queried or referenced.
    #[error("node {node} out of range for a graph of {num_nodes} nodes")]
    OutOfRangeNode { node: NodeId, num_nodes: usize },
    /// The evaluator was handed a path node that no partition contains.
    #[error("node {0} appears in the path but is not assigned to any partition")]
    UnassignedNode(NodeId),
    /// A configuration constant is not positive.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// An assignment breaks the coverage or capacity invariant.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),
}

/// Why an exact solve did not yield an assignment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveFailure {
    /// The constraint model has no solution.
    #[error("model is unsatisfiable")]
    Unsatisfiable,
    /// The solve did not finish inside its time budget.
    #[error("solver exceeded its time budget of {budget:?}")]
    TimedOut { budget: Duration },
    /// The backend failed or gave up without a verdict.
    #[error("solver error: {0}")]
    Solver(String),
    /// The backend returned labels that violate the model.
    #[error("solver returned an inconsistent model: {0}")]
    InconsistentModel(String),
}

impl PartitionError {
    /// `true` for failures that only abort one strategy of a comparison.
    pub fn is_strategy_local(&self) -> bool {
        matches!(
            self,
            PartitionError::Infeasible { .. } | PartitionError::NoSolutionFound(_)
        )
    }
}
