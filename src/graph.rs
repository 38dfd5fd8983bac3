//! Directed communication graph between compute nodes.
//!
//! Edge `i -> j` means node `i` talks to node `j`. Edges are not symmetric.
//! The graph is built once and never mutated afterwards; every partitioner,
//! the traversal and the evaluator only read it.

use serde::{Deserialize, Serialize};

use crate::partitioning::error::PartitionError;
use crate::partitioning::graph_traits::PartitionableGraph;

/// Dense node identifier in `[0, num_nodes)`.
pub type NodeId = usize;

/// Adjacency-list graph indexed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<NodeId>>", into = "Vec<Vec<NodeId>>")]
pub struct Graph {
    adjacency: Vec<Vec<NodeId>>,
}

impl Graph {
    /// Builds a graph from per-node outgoing neighbour lists.
    ///
    /// Self-loops and duplicate edges are the producer's responsibility and
    /// are not checked here.
    ///
    /// # Errors
    /// `OutOfRangeNode` if any edge target is not a node of the graph.
    pub fn new(adjacency: Vec<Vec<NodeId>>) -> Result<Self, PartitionError> {
        let num_nodes = adjacency.len();
        if let Some(&node) = adjacency.iter().flatten().find(|&&j| j >= num_nodes) {
            return Err(PartitionError::OutOfRangeNode { node, num_nodes });
        }
        Ok(Self { adjacency })
    }

    /// Builds a graph with `num_nodes` nodes from a directed edge list.
    pub fn from_edges(
        num_nodes: usize,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Self, PartitionError> {
        let mut adjacency = vec![Vec::new(); num_nodes];
        for (u, v) in edges {
            let out = adjacency
                .get_mut(u)
                .ok_or(PartitionError::OutOfRangeNode { node: u, num_nodes })?;
            out.push(v);
        }
        Self::new(adjacency)
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Raw adjacency lists.
    pub fn adjacency(&self) -> &[Vec<NodeId>] {
        &self.adjacency
    }
}

impl TryFrom<Vec<Vec<NodeId>>> for Graph {
    type Error = PartitionError;

    fn try_from(adjacency: Vec<Vec<NodeId>>) -> Result<Self, Self::Error> {
        Self::new(adjacency)
    }
}

impl From<Graph> for Vec<Vec<NodeId>> {
    fn from(graph: Graph) -> Self {
        graph.adjacency
    }
}

impl PartitionableGraph for Graph {
    fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    fn neighbors(&self, v: NodeId) -> Result<&[NodeId], PartitionError> {
        self.adjacency
            .get(v)
            .map(Vec::as_slice)
            .ok_or(PartitionError::OutOfRangeNode {
                node: v,
                num_nodes: self.adjacency.len(),
            })
    }
}
