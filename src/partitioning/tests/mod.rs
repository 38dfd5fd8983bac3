use super::*;

use crate::graph::Graph;

/// Four nodes, no edges.
#[derive(Debug)]
struct DummyGraph;
impl PartitionableGraph for DummyGraph {
    fn num_vertices(&self) -> usize {
        4
    }
    fn neighbors(&self, v: usize) -> Result<&[usize], PartitionError> {
        if v < 4 {
            Ok(&[])
        } else {
            Err(PartitionError::OutOfRangeNode {
                node: v,
                num_nodes: 4,
            })
        }
    }
}

#[test]
fn trivial_partition_every_strategy() {
    let g = DummyGraph;
    let strategies: Vec<Box<dyn PartitionStrategy>> = vec![
        Box::new(RandomCapacity::new(3)),
        Box::new(GreedyAffinity::new()),
        Box::new(ExactPartitioner::new(MilpOptimizer)),
    ];
    for s in &strategies {
        let a = s.partition(&g, Capacity::new(2, 2)).unwrap();
        a.validate(4, 2).unwrap();
        assert_eq!(edge_cut(&g, &a).unwrap(), 0, "{}", s.name());
    }
}

#[test]
fn capacity_check() {
    assert!(Capacity::new(2, 2).check(4).is_ok());
    assert_eq!(
        Capacity::new(0, 2).check(4),
        Err(PartitionError::CapacityInfeasible {
            num_nodes: 4,
            num_partitions: 0,
            max_per_partition: 2
        })
    );
    assert_eq!(
        Capacity::new(1, 0).check(1),
        Err(PartitionError::CapacityInfeasible {
            num_nodes: 1,
            num_partitions: 1,
            max_per_partition: 0
        })
    );
    assert!(matches!(
        Capacity::new(2, 2).check(0),
        Err(PartitionError::InvalidConfig(_))
    ));
    assert_eq!(
        Capacity::new(2, 2).check(5),
        Err(PartitionError::CapacityInfeasible {
            num_nodes: 5,
            num_partitions: 2,
            max_per_partition: 2
        })
    );
    assert_eq!(Capacity::new(usize::MAX, 2).total(), usize::MAX);
}

#[test]
fn free_functions_match_strategies() {
    let g = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
    let cap = Capacity::new(3, 2);
    assert_eq!(
        partition_greedy(&g, 3, 2).unwrap(),
        GreedyAffinity::new().partition(&g, cap).unwrap()
    );
    assert_eq!(
        partition_random(&g, 3, 2, 9).unwrap(),
        RandomCapacity::new(9).partition(&g, cap).unwrap()
    );
    let exact = partition_exact(&g, 3, 2, true, None).unwrap();
    exact.validate(5, 2).unwrap();
    assert_eq!(exact.group(0).map(|g| g.contains(&0)), Some(true));
    assert_eq!(edge_cut(&g, &exact).unwrap(), 3);
}

#[test]
fn heuristics_reject_zero_capacity() {
    let g = Graph::from_edges(1, []).unwrap();
    assert!(matches!(
        partition_random(&g, 1, 0, 0),
        Err(PartitionError::Infeasible { .. })
    ));
    assert!(matches!(
        partition_greedy(&g, 1, 0),
        Err(PartitionError::Infeasible { .. })
    ));
    assert_eq!(
        partition_exact(&g, 1, 0, true, None),
        Err(PartitionError::NoSolutionFound(SolveFailure::Unsatisfiable))
    );
}
