//! Entry-point for capacity-constrained graph partitioning.
//!
//! | Strategy | Quality | Deterministic | Termination |
//! |---|---|---|---|
//! | [`RandomCapacity`] | baseline | per seed | O(N·P) |
//! | [`GreedyAffinity`] | medium | yes | O(E + N·P log P) |
//! | [`ExactPartitioner`] | optimal edge cut | per backend | time budget |
//!
//! Every strategy implements [`PartitionStrategy`] so a comparison can run
//! them side by side and report each result independently.

pub mod assignment;
pub mod error;
pub mod exact;
pub mod graph_traits;
pub mod greedy;
pub mod metrics;
pub mod random;

pub use self::assignment::{PartitionAssignment, PartitionMap};
pub use self::error::{PartitionError, SolveFailure};
pub use self::exact::{CutModel, ExactOptimizer, ExactPartitioner, MilpOptimizer};
#[cfg(feature = "z3-solver")]
pub use self::exact::Z3Optimizer;
pub use self::graph_traits::PartitionableGraph;
pub use self::greedy::GreedyAffinity;
pub use self::metrics::*;
pub use self::random::RandomCapacity;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub type PartitionId = usize;

/// Partition count and per-partition node limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub num_partitions: usize,
    pub max_per_partition: usize,
}

impl Capacity {
    pub fn new(num_partitions: usize, max_per_partition: usize) -> Self {
        Self {
            num_partitions,
            max_per_partition,
        }
    }

    /// Total number of node slots.
    pub fn total(&self) -> usize {
        self.num_partitions.saturating_mul(self.max_per_partition)
    }

    /// Whether `num_nodes` nodes fit at all.
    pub fn fits(&self, num_nodes: usize) -> bool {
        self.total() >= num_nodes
    }

    /// Startup check over all constants together.
    ///
    /// With at least one node, a zero partition count or a zero capacity is a
    /// shortfall like any other and reported as such.
    ///
    /// # Errors
    /// `InvalidConfig` for a zero node count, `CapacityInfeasible` when the
    /// slots cannot hold `num_nodes`.
    pub fn check(&self, num_nodes: usize) -> Result<(), PartitionError> {
        if num_nodes == 0 {
            return Err(PartitionError::InvalidConfig("node count must be positive"));
        }
        if !self.fits(num_nodes) {
            return Err(PartitionError::CapacityInfeasible {
                num_nodes,
                num_partitions: self.num_partitions,
                max_per_partition: self.max_per_partition,
            });
        }
        Ok(())
    }
}

/// Trait for partition strategies.
///
/// A strategy reads the graph and produces a fresh [`PartitionAssignment`]
/// that covers every node once and respects `capacity`. Strategies keep no
/// state between calls, so one instance may serve concurrent callers.
pub trait PartitionStrategy: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// Partitions `graph` under `capacity`.
    fn partition(
        &self,
        graph: &dyn PartitionableGraph,
        capacity: Capacity,
    ) -> Result<PartitionAssignment, PartitionError>;
}

/// Uniform random placement among partitions with room, seeded by `seed`.
pub fn partition_random<G>(
    graph: &G,
    num_partitions: usize,
    max_per_partition: usize,
    seed: u64,
) -> Result<PartitionAssignment, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    random::random_capacity(graph, Capacity::new(num_partitions, max_per_partition), seed)
}

/// Single-pass neighbour-affinity placement in ascending node order.
pub fn partition_greedy<G>(
    graph: &G,
    num_partitions: usize,
    max_per_partition: usize,
) -> Result<PartitionAssignment, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    greedy::greedy_affinity(graph, Capacity::new(num_partitions, max_per_partition))
}

/// Minimum edge-cut placement computed by the default [`MilpOptimizer`].
///
/// `time_budget` bounds the solve; expiry yields `NoSolutionFound`.
pub fn partition_exact<G>(
    graph: &G,
    num_partitions: usize,
    max_per_partition: usize,
    pin_first_to_zero: bool,
    time_budget: Option<Duration>,
) -> Result<PartitionAssignment, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    ExactPartitioner::new(MilpOptimizer)
        .pin_first_to_zero(pin_first_to_zero)
        .time_budget(time_budget)
        .run(graph, Capacity::new(num_partitions, max_per_partition))
}

#[cfg(test)]
mod tests;
