//! Greedy neighbour-affinity placement.
//!
//! Nodes are processed once, in ascending id order. For node `n` the
//! partitions are ranked by how many of `n`'s *outgoing* neighbours already
//! sit on them (ties go to the lower partition id), and `n` goes to the best
//! ranked partition with room. Incoming edges from earlier nodes are not
//! counted. There is no backtracking, so the result depends on the order.
//!
//! ```text
//! score(n, p) = |{ m in out(n) : label(m) == p }|
//! ```

use std::cmp::Reverse;

use crate::partitioning::assignment::{AssignmentBuilder, PartitionAssignment};
use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::PartitionableGraph;
use crate::partitioning::{Capacity, PartitionId, PartitionStrategy};

const NAME: &str = "greedy-affinity";

/// Greedy affinity strategy. Fully deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyAffinity;

impl GreedyAffinity {
    pub fn new() -> Self {
        Self
    }
}

impl PartitionStrategy for GreedyAffinity {
    fn name(&self) -> &str {
        NAME
    }

    fn partition(
        &self,
        graph: &dyn PartitionableGraph,
        capacity: Capacity,
    ) -> Result<PartitionAssignment, PartitionError> {
        greedy_affinity(graph, capacity)
    }
}

/// Runs the greedy pass.
///
/// # Errors
/// `Infeasible` if the partitions cannot hold all nodes (checked up front),
/// `OutOfRangeNode` if the graph reports a neighbour outside its domain.
pub fn greedy_affinity<G>(
    graph: &G,
    capacity: Capacity,
) -> Result<PartitionAssignment, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    let n = graph.num_vertices();
    if !capacity.fits(n) {
        return Err(PartitionError::Infeasible {
            strategy: NAME,
            node: capacity.total(),
        });
    }

    let mut builder =
        AssignmentBuilder::new(n, capacity.num_partitions, capacity.max_per_partition);
    let mut counts = vec![0usize; capacity.num_partitions];
    let mut ranking: Vec<PartitionId> = Vec::with_capacity(capacity.num_partitions);

    for v in graph.vertices() {
        affinity_counts(graph, &builder, v, &mut counts)?;
        rank_partitions(&counts, &mut ranking);
        let p = ranking
            .iter()
            .copied()
            .find(|&p| builder.has_room(p))
            .ok_or(PartitionError::Infeasible {
                strategy: NAME,
                node: v,
            })?;
        log::trace!("{NAME}: node {v} -> partition {p} (affinity {})", counts[p]);
        builder.assign(v, p);
    }
    Ok(builder.finish())
}

/// Counts, per partition, the already placed outgoing neighbours of `v`.
fn affinity_counts<G>(
    graph: &G,
    builder: &AssignmentBuilder,
    v: usize,
    counts: &mut [usize],
) -> Result<(), PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    counts.iter_mut().for_each(|c| *c = 0);
    for &m in graph.neighbors(v)? {
        if !graph.contains(m) {
            return Err(PartitionError::OutOfRangeNode {
                node: m,
                num_nodes: graph.num_vertices(),
            });
        }
        if let Some(p) = builder.label(m) {
            counts[p] += 1;
        }
    }
    Ok(())
}

/// Partition ids by descending count; stable, so equal counts keep ascending ids.
fn rank_partitions(counts: &[usize], ranking: &mut Vec<PartitionId>) {
    ranking.clear();
    ranking.extend(0..counts.len());
    ranking.sort_by_key(|&p| Reverse(counts[p]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_greedy_follows_outgoing_neighbours() {
        // Node 2 follows node 0 onto partition 0. Node 3 points at 2, but
        // partition 0 is full by then, so it opens partition 1.
        let g = Graph::from_edges(4, [(2, 0), (3, 2)]).unwrap();
        let a = greedy_affinity(&g, Capacity::new(2, 3)).unwrap();
        assert_eq!(a.groups(), &[vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn test_affinity_ignores_incoming_edges() {
        // 0 -> 2 and 1 -> 2 point at node 2; node 2 itself points at 3.
        let g = Graph::from_edges(4, [(0, 2), (1, 2), (2, 3)]).unwrap();
        let mut b = AssignmentBuilder::new(4, 3, 2);
        b.assign(0, 1);
        b.assign(1, 1);
        b.assign(3, 2);
        let mut counts = vec![0; 3];
        affinity_counts(&g, &b, 2, &mut counts).unwrap();
        assert_eq!(counts, vec![0, 0, 1]);
    }

    #[test]
    fn test_rank_partitions_descending_then_by_id() {
        let mut ranking = Vec::new();
        rank_partitions(&[1, 3, 0, 3], &mut ranking);
        assert_eq!(ranking, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_greedy_full_partition_falls_through() {
        // Both neighbours of node 2 sit on the full partition 0.
        let g = Graph::from_edges(3, [(2, 0), (2, 1)]).unwrap();
        let a = greedy_affinity(&g, Capacity::new(2, 2)).unwrap();
        assert_eq!(a.groups(), &[vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_greedy_chain_packs_blocks() {
        let g = Graph::from_edges(4, [(1, 0), (2, 1), (3, 2)]).unwrap();
        let a = greedy_affinity(&g, Capacity::new(2, 2)).unwrap();
        assert_eq!(a.groups(), &[vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_greedy_deterministic() {
        let g = Graph::from_edges(6, [(0, 3), (1, 4), (2, 5), (5, 0), (4, 2)]).unwrap();
        let cap = Capacity::new(3, 2);
        assert_eq!(
            greedy_affinity(&g, cap).unwrap(),
            greedy_affinity(&g, cap).unwrap()
        );
    }

    #[test]
    fn test_greedy_budget_too_small() {
        let g = Graph::new(vec![Vec::new()]).unwrap();
        let err = greedy_affinity(&g, Capacity::new(1, 0)).unwrap_err();
        assert_eq!(
            err,
            PartitionError::Infeasible {
                strategy: NAME,
                node: 0
            }
        );
    }
}
