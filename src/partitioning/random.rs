//! Uniform random placement with capacity backoff.
//!
//! Nodes are visited in ascending id order; each one lands on a partition
//! drawn uniformly from those that still have room. This is the baseline
//! every other strategy is compared against.
//!
//! Randomness is always injected: either a `u64` seed (expanded with
//! `SmallRng`) or a caller-supplied [`Rng`]. No ambient RNG is used, so two
//! runs with the same seed produce the same assignment.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::partitioning::assignment::{AssignmentBuilder, PartitionAssignment};
use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::PartitionableGraph;
use crate::partitioning::{Capacity, PartitionStrategy};

const NAME: &str = "random-capacity";

/// Random placement strategy with a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomCapacity {
    pub seed: u64,
}

impl RandomCapacity {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl PartitionStrategy for RandomCapacity {
    fn name(&self) -> &str {
        NAME
    }

    fn partition(
        &self,
        graph: &dyn PartitionableGraph,
        capacity: Capacity,
    ) -> Result<PartitionAssignment, PartitionError> {
        random_capacity(graph, capacity, self.seed)
    }
}

/// Seeded entry point; see [`random_capacity_with_rng`].
pub fn random_capacity<G>(
    graph: &G,
    capacity: Capacity,
    seed: u64,
) -> Result<PartitionAssignment, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    let mut rng = SmallRng::seed_from_u64(seed);
    random_capacity_with_rng(graph, capacity, &mut rng)
}

/// Places every node on a uniformly chosen partition with remaining room.
///
/// # Errors
/// `Infeasible` if the partitions cannot hold all nodes. The shortfall is
/// detected before any node is placed.
pub fn random_capacity_with_rng<G, R>(
    graph: &G,
    capacity: Capacity,
    rng: &mut R,
) -> Result<PartitionAssignment, PartitionError>
where
    G: PartitionableGraph + ?Sized,
    R: Rng,
{
    let n = graph.num_vertices();
    if !capacity.fits(n) {
        // The first node past the last free slot is the one that cannot be placed.
        return Err(PartitionError::Infeasible {
            strategy: NAME,
            node: capacity.total(),
        });
    }

    let mut builder =
        AssignmentBuilder::new(n, capacity.num_partitions, capacity.max_per_partition);
    for v in graph.vertices() {
        let open = builder.open_partitions();
        if open.is_empty() {
            return Err(PartitionError::Infeasible {
                strategy: NAME,
                node: v,
            });
        }
        let p = open[rng.gen_range(0..open.len())];
        log::trace!("{NAME}: node {v} -> partition {p} ({} open)", open.len());
        builder.assign(v, p);
    }
    Ok(builder.finish())
}
