//! Partitioning metrics utilities.
//!
//! [`evaluate`] is the score every strategy is ranked by: the number of
//! partition-boundary crossings along a traversal path. [`edge_cut`] is the
//! objective the exact partitioner minimises, and the load helpers report
//! how evenly a strategy filled the partitions.

use itertools::Itertools;

use crate::graph::NodeId;
use crate::partitioning::PartitionAssignment;
use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::PartitionableGraph;

/// Counts adjacent path pairs whose nodes sit on different partitions (O(len(path))).
///
/// The result lies in `[0, len(path) - 1]`, and is 0 for paths shorter than two.
///
/// # Errors
/// `UnassignedNode` if a path node is missing from `assignment`,
/// `OutOfRangeNode` if `assignment` holds an id past its node count.
pub fn evaluate(
    assignment: &PartitionAssignment,
    path: &[NodeId],
) -> Result<usize, PartitionError> {
    let pm = assignment.node_to_partition()?;
    // Resolve every node first so a missing one is reported even in a 1-node path.
    let parts = path
        .iter()
        .map(|&v| pm.part_of(v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts
        .iter()
        .tuple_windows()
        .filter(|(a, b)| a != b)
        .count())
}

/// Computes the directed edge cut of a partitioning (O(E)).
///
/// Each edge `i -> j` with `i` and `j` on different partitions counts once;
/// a pair linked in both directions counts twice.
///
/// # Errors
/// `UnassignedNode` if an edge endpoint is missing from `assignment`,
/// `OutOfRangeNode` if `assignment` holds an id past its node count or the
/// graph reports a neighbour outside its domain.
pub fn edge_cut<G>(g: &G, assignment: &PartitionAssignment) -> Result<usize, PartitionError>
where
    G: PartitionableGraph + ?Sized,
{
    let pm = assignment.node_to_partition()?;
    let mut cut = 0;
    for edge in g.edges() {
        let (u, v) = edge?;
        if pm.part_of(u)? != pm.part_of(v)? {
            cut += 1;
        }
    }
    Ok(cut)
}

/// Number of nodes on each partition.
pub fn partition_loads(assignment: &PartitionAssignment) -> Vec<usize> {
    assignment.sizes()
}

/// Returns `(min, max)` partition load over all partitions, empty ones included.
pub fn load_balance(assignment: &PartitionAssignment) -> (usize, usize) {
    match assignment.groups().iter().map(Vec::len).minmax() {
        itertools::MinMaxResult::NoElements => (0, 0),
        itertools::MinMaxResult::OneElement(x) => (x, x),
        itertools::MinMaxResult::MinMax(lo, hi) => (lo, hi),
    }
}
