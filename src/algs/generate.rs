//! Seeded random communication networks.
//!
//! Stand-in for the workload source: every node talks to a random subset of
//! the other nodes. For node `i`, `k` is drawn uniformly from
//! `[1, max(3, N - 1)]`, `k` targets are drawn with replacement from the
//! other nodes, and repeats are dropped. The result never has self-loops or
//! duplicate edges. `max_out_degree` caps `k` to keep networks sparse.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId};
use crate::partitioning::error::PartitionError;

/// Parameters of the random network source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkGenerator {
    pub num_nodes: usize,
    pub max_out_degree: Option<usize>,
    pub seed: u64,
}

impl NetworkGenerator {
    pub fn new(num_nodes: usize, seed: u64) -> Self {
        Self {
            num_nodes,
            max_out_degree: None,
            seed,
        }
    }

    pub fn max_out_degree(mut self, cap: Option<usize>) -> Self {
        self.max_out_degree = cap;
        self
    }

    /// Draws a network. The same parameters always give the same graph.
    pub fn generate(&self) -> Result<Graph, PartitionError> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let n = self.num_nodes;
        let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); n];

        for (i, out) in adjacency.iter_mut().enumerate() {
            let candidates: Vec<NodeId> = (0..n).filter(|&j| j != i).collect();
            if candidates.is_empty() {
                continue;
            }
            let mut k = rng.gen_range(1..=candidates.len().max(3));
            if let Some(cap) = self.max_out_degree {
                k = k.min(cap);
            }
            for _ in 0..k {
                let j = candidates[rng.gen_range(0..candidates.len())];
                if !out.contains(&j) {
                    out.push(j);
                }
            }
        }
        log::debug!(
            "generated network: {n} nodes, {} edges (seed {})",
            adjacency.iter().map(Vec::len).sum::<usize>(),
            self.seed
        );
        Graph::new(adjacency)
    }
}
