//! Depth-bounded BFS walks over a partitionable graph.
//!
//! The walk is the workload probe every assignment is scored against: the
//! order in which nodes are discovered stands in for the order a walker
//! would hop between them.

use std::collections::VecDeque;

use crate::graph::NodeId;
use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::PartitionableGraph;

/// Breadth-first walk from `start`, returning `(node, depth)` in discovery order.
///
/// `start` is reported at depth 0. A node found at depth `d >= max_depth` is
/// recorded but its neighbours are not explored. Each node appears once.
///
/// # Errors
/// `OutOfRangeNode` if `start` or any visited neighbour lies outside the graph.
pub fn bfs_depths<G>(
    graph: &G,
    start: NodeId,
    max_depth: u32,
) -> Result<Vec<(NodeId, u32)>, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    let n = graph.num_vertices();
    if !graph.contains(start) {
        return Err(PartitionError::OutOfRangeNode {
            node: start,
            num_nodes: n,
        });
    }
    let mut seen = vec![false; n];
    let mut out = vec![(start, 0)];
    let mut q: VecDeque<(NodeId, u32)> = VecDeque::from([(start, 0)]);
    seen[start] = true;

    while let Some((p, d)) = q.pop_front() {
        if d >= max_depth {
            continue;
        }
        for &next in graph.neighbors(p)? {
            let slot = seen.get_mut(next).ok_or(PartitionError::OutOfRangeNode {
                node: next,
                num_nodes: n,
            })?;
            if !*slot {
                *slot = true;
                out.push((next, d + 1));
                q.push_back((next, d + 1));
            }
        }
    }
    log::debug!(
        "bfs from {start} (max depth {max_depth}) reached {} of {n} nodes",
        out.len()
    );
    Ok(out)
}

/// Breadth-first walk from `start` bounded by `max_depth`; node ids only.
///
/// See [`bfs_depths`] for the exact semantics.
pub fn bfs_walk<G>(graph: &G, start: NodeId, max_depth: u32) -> Result<Vec<NodeId>, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    Ok(bfs_depths(graph, start, max_depth)?
        .into_iter()
        .map(|(v, _)| v)
        .collect())
}
