//! Partition assignments and their derived node-to-partition index.
//!
//! A [`PartitionAssignment`] stores one group of node ids per partition. The
//! reverse lookup, [`PartitionMap`], is never stored next to the groups: it
//! is rebuilt from them in O(N) whenever an evaluator or a check needs it.
//! Partitioners build assignments through an [`AssignmentBuilder`], whose
//! per-node labels are the only mutable state during construction.

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;
use crate::partitioning::PartitionId;
use crate::partitioning::error::PartitionError;

/// Nodes grouped by partition; `groups[p]` holds the ids placed on `p`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionAssignment {
    groups: Vec<Vec<NodeId>>,
}

impl PartitionAssignment {
    /// Wraps explicit groups, sorting each one.
    ///
    /// No invariant is checked; call [`validate`](Self::validate) for that.
    pub fn from_groups(mut groups: Vec<Vec<NodeId>>) -> Self {
        for g in &mut groups {
            g.sort_unstable();
        }
        Self { groups }
    }

    /// Builds groups from one partition label per node (`labels[node]`).
    ///
    /// # Errors
    /// `InvalidAssignment` if a label is `>= num_partitions`.
    pub fn from_labels(
        labels: &[PartitionId],
        num_partitions: usize,
    ) -> Result<Self, PartitionError> {
        let mut groups = vec![Vec::new(); num_partitions];
        for (node, &p) in labels.iter().enumerate() {
            groups
                .get_mut(p)
                .ok_or_else(|| {
                    PartitionError::InvalidAssignment(format!(
                        "node {node} labelled with partition {p}, only {num_partitions} exist"
                    ))
                })?
                .push(node);
        }
        Ok(Self { groups })
    }

    /// Number of partitions, including empty ones.
    pub fn num_partitions(&self) -> usize {
        self.groups.len()
    }

    /// Total number of placed nodes.
    pub fn num_nodes(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Nodes on partition `p`, if it exists.
    pub fn group(&self, p: PartitionId) -> Option<&[NodeId]> {
        self.groups.get(p).map(Vec::as_slice)
    }

    /// All groups in partition order.
    pub fn groups(&self) -> &[Vec<NodeId>] {
        &self.groups
    }

    /// Number of nodes on each partition.
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Iterates `(node, partition)` pairs, partition by partition.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, PartitionId)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .flat_map(|(p, nodes)| nodes.iter().map(move |&v| (v, p)))
    }

    /// Rebuilds the node-to-partition index over `[0, num_nodes())`.
    ///
    /// A covering assignment places exactly the ids below its node count, so
    /// the index never outgrows the assignment. If a node were listed twice
    /// the later group wins; [`validate`](Self::validate) rejects such
    /// assignments.
    ///
    /// # Errors
    /// `OutOfRangeNode` if a group holds an id `>= num_nodes()`.
    pub fn node_to_partition(&self) -> Result<PartitionMap, PartitionError> {
        let mut pm = PartitionMap::with_len(self.num_nodes());
        for (v, p) in self.iter() {
            pm.insert(v, p)?;
        }
        Ok(pm)
    }

    /// Checks coverage (every node in `[0, num_nodes)` placed exactly once)
    /// and capacity (no group larger than `max_per_partition`).
    pub fn validate(
        &self,
        num_nodes: usize,
        max_per_partition: usize,
    ) -> Result<(), PartitionError> {
        for (p, nodes) in self.groups.iter().enumerate() {
            if nodes.len() > max_per_partition {
                return Err(PartitionError::InvalidAssignment(format!(
                    "partition {p} holds {} nodes, capacity is {max_per_partition}",
                    nodes.len()
                )));
            }
        }
        let mut seen = vec![false; num_nodes];
        for (v, p) in self.iter() {
            match seen.get_mut(v) {
                None => {
                    return Err(PartitionError::InvalidAssignment(format!(
                        "partition {p} holds node {v}, graph has {num_nodes} nodes"
                    )));
                }
                Some(true) => {
                    return Err(PartitionError::InvalidAssignment(format!(
                        "node {v} assigned more than once"
                    )));
                }
                Some(slot) => *slot = true,
            }
        }
        if let Some(v) = seen.iter().position(|&s| !s) {
            return Err(PartitionError::InvalidAssignment(format!(
                "node {v} is not assigned"
            )));
        }
        Ok(())
    }
}

/// Dense node-to-partition index derived from a [`PartitionAssignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMap(Vec<Option<PartitionId>>);

impl PartitionMap {
    pub fn with_len(len: usize) -> Self {
        Self(vec![None; len])
    }
    /// Records `v -> p`; the index never grows past its initial length.
    ///
    /// # Errors
    /// `OutOfRangeNode` if `v` lies past the end of the index.
    pub fn insert(&mut self, v: NodeId, p: PartitionId) -> Result<(), PartitionError> {
        let num_nodes = self.0.len();
        let slot = self
            .0
            .get_mut(v)
            .ok_or(PartitionError::OutOfRangeNode { node: v, num_nodes })?;
        *slot = Some(p);
        Ok(())
    }
    pub fn get(&self, v: NodeId) -> Option<PartitionId> {
        self.0.get(v).copied().flatten()
    }
    /// Returns the part ID for a given vertex.
    ///
    /// # Errors
    /// `UnassignedNode` if the vertex is not present in the map.
    pub fn part_of(&self, v: NodeId) -> Result<PartitionId, PartitionError> {
        self.get(v).ok_or(PartitionError::UnassignedNode(v))
    }
    /// Number of assigned nodes.
    pub fn len(&self) -> usize {
        self.0.iter().filter(|p| p.is_some()).count()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scratch state for building one assignment.
///
/// Labels are the source of truth while a partitioner runs; group sizes are
/// counted alongside so capacity checks stay O(1). Each partitioner
/// invocation owns its builder.
#[derive(Debug, Clone)]
pub(crate) struct AssignmentBuilder {
    labels: Vec<Option<PartitionId>>,
    sizes: Vec<usize>,
    max_per_partition: usize,
}

impl AssignmentBuilder {
    pub(crate) fn new(num_nodes: usize, num_partitions: usize, max_per_partition: usize) -> Self {
        Self {
            labels: vec![None; num_nodes],
            sizes: vec![0; num_partitions],
            max_per_partition,
        }
    }

    pub(crate) fn has_room(&self, p: PartitionId) -> bool {
        self.sizes[p] < self.max_per_partition
    }

    /// Partitions that can still take a node, in ascending order.
    pub(crate) fn open_partitions(&self) -> Vec<PartitionId> {
        (0..self.sizes.len()).filter(|&p| self.has_room(p)).collect()
    }

    pub(crate) fn label(&self, v: NodeId) -> Option<PartitionId> {
        self.labels.get(v).copied().flatten()
    }

    pub(crate) fn assign(&mut self, v: NodeId, p: PartitionId) {
        debug_assert!(self.labels[v].is_none(), "node {v} placed twice");
        debug_assert!(self.has_room(p), "partition {p} over capacity");
        self.labels[v] = Some(p);
        self.sizes[p] += 1;
    }

    /// Consumes the builder. Nodes never placed are left out of every group.
    pub(crate) fn finish(self) -> PartitionAssignment {
        let mut groups = vec![Vec::new(); self.sizes.len()];
        for (v, p) in self.labels.into_iter().enumerate() {
            if let Some(p) = p {
                groups[p].push(v);
            }
        }
        PartitionAssignment { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_labels_groups_ascending() {
        let a = PartitionAssignment::from_labels(&[1, 0, 1, 0], 2).unwrap();
        assert_eq!(a.groups(), &[vec![1, 3], vec![0, 2]]);
        assert_eq!(a.sizes(), vec![2, 2]);
        assert!(a.validate(4, 2).is_ok());
    }

    #[test]
    fn from_labels_rejects_unknown_partition() {
        assert!(matches!(
            PartitionAssignment::from_labels(&[0, 2], 2),
            Err(PartitionError::InvalidAssignment(_))
        ));
    }

    #[test]
    fn node_to_partition_is_derived() {
        let a = PartitionAssignment::from_groups(vec![vec![2, 0], vec![1]]);
        let pm = a.node_to_partition().unwrap();
        assert_eq!(pm.len(), 3);
        assert_eq!(pm.part_of(0), Ok(0));
        assert_eq!(pm.part_of(1), Ok(1));
        assert_eq!(pm.part_of(2), Ok(0));
        assert_eq!(pm.part_of(3), Err(PartitionError::UnassignedNode(3)));
    }

    #[test]
    fn node_to_partition_rejects_stray_ids() {
        let huge = PartitionAssignment::from_groups(vec![vec![0, usize::MAX]]);
        assert_eq!(
            huge.node_to_partition(),
            Err(PartitionError::OutOfRangeNode {
                node: usize::MAX,
                num_nodes: 2
            })
        );
        let far = PartitionAssignment::from_groups(vec![vec![1 << 40], vec![0]]);
        assert!(matches!(
            far.node_to_partition(),
            Err(PartitionError::OutOfRangeNode { node, .. }) if node == 1 << 40
        ));
        let mut pm = PartitionMap::with_len(1);
        assert!(pm.insert(1, 0).is_err());
        assert!(pm.is_empty());
    }

    #[test]
    fn validate_catches_each_violation() {
        let over = PartitionAssignment::from_groups(vec![vec![0, 1, 2], vec![]]);
        assert!(over.validate(3, 2).is_err());

        let dup = PartitionAssignment::from_groups(vec![vec![0, 1], vec![1]]);
        assert!(dup.validate(2, 2).is_err());

        let missing = PartitionAssignment::from_groups(vec![vec![0], vec![2]]);
        assert!(missing.validate(3, 2).is_err());

        let foreign = PartitionAssignment::from_groups(vec![vec![0, 5]]);
        assert!(foreign.validate(2, 2).is_err());
    }

    #[test]
    fn builder_tracks_capacity() {
        let mut b = AssignmentBuilder::new(3, 2, 1);
        assert_eq!(b.open_partitions(), vec![0, 1]);
        b.assign(0, 1);
        assert_eq!(b.label(0), Some(1));
        assert_eq!(b.open_partitions(), vec![0]);
        b.assign(2, 0);
        assert!(b.open_partitions().is_empty());
        let a = b.finish();
        assert_eq!(a.groups(), &[vec![2], vec![0]]);
        assert!(a.validate(3, 1).is_err(), "node 1 was never placed");
    }
}
