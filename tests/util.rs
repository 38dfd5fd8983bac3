#![allow(dead_code)]
use dpu_partition::graph::Graph;
use dpu_partition::partitioning::PartitionAssignment;

/// Directed chain `0 -> 1 -> ... -> n-1`.
pub fn chain(n: usize) -> Graph {
    Graph::from_edges(n, (1..n).map(|v| (v - 1, v))).unwrap()
}

/// Assignment from explicit groups.
pub fn groups(gs: &[&[usize]]) -> PartitionAssignment {
    PartitionAssignment::from_groups(gs.iter().map(|g| g.to_vec()).collect())
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
