// Graph trait abstraction for partitioning
use std::iter;
use std::ops::Range;

use itertools::Either;

use crate::graph::NodeId;
use crate::partitioning::error::PartitionError;

/// Trait for directed graphs that can be partitioned.
//
/// All methods are read-only and require no interior mutability, so a graph
/// can be shared between strategies running side by side.
///
/// Vertices are the dense range `0..num_vertices()`. Edges are directed: the
/// neighbours of `v` are its outgoing targets only.
pub trait PartitionableGraph: Sync {
    /// Number of vertices.
    fn num_vertices(&self) -> usize;

    /// Outgoing neighbours of `v`, in insertion order.
    ///
    /// # Errors
    /// `OutOfRangeNode` if `v >= num_vertices()`.
    fn neighbors(&self, v: NodeId) -> Result<&[NodeId], PartitionError>;

    /// All vertex ids in ascending order.
    fn vertices(&self) -> Range<NodeId> {
        0..self.num_vertices()
    }

    /// Whether `v` is a vertex of this graph.
    fn contains(&self, v: NodeId) -> bool {
        v < self.num_vertices()
    }

    /// Out-degree of `v`.
    fn degree(&self, v: NodeId) -> Result<usize, PartitionError> {
        Ok(self.neighbors(v)?.len())
    }

    /// Iterator over every directed edge `(u, v)` exactly once, grouped by `u`.
    ///
    /// A vertex whose neighbour query fails yields that error in place of
    /// its edges.
    fn edges(&self) -> Box<dyn Iterator<Item = Result<(NodeId, NodeId), PartitionError>> + '_> {
        Box::new(self.vertices().flat_map(move |u| match self.neighbors(u) {
            Ok(ns) => Either::Left(ns.iter().map(move |&v| Ok((u, v)))),
            Err(e) => Either::Right(iter::once(Err(e))),
        }))
    }

    /// Total number of directed edges.
    fn num_edges(&self) -> Result<usize, PartitionError> {
        self.vertices().map(|u| self.degree(u)).sum()
    }
}
