//! Exact minimum edge-cut partitioning.
//!
//! The problem is stated once, as a [`CutModel`]:
//!
//! ```text
//! variables    x[i] in [0, P)                    one per node
//! capacity     |{ i : x[i] == p }| <= C          for every partition p
//! pin          x[0] == 0                         optional
//! minimise     sum over edges (i, j) of [x[i] != x[j]]
//! ```
//!
//! Solving is delegated to an [`ExactOptimizer`] backend. Whatever labels a
//! backend returns are checked against the model before they become a
//! [`PartitionAssignment`]; a backend that fails, gives up, runs out of time,
//! or answers inconsistently yields `NoSolutionFound` and never a partial
//! assignment.

mod milp;
#[cfg(feature = "z3-solver")]
mod smt;

pub use self::milp::MilpOptimizer;
#[cfg(feature = "z3-solver")]
pub use self::smt::Z3Optimizer;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use crate::graph::NodeId;
use crate::partitioning::assignment::PartitionAssignment;
use crate::partitioning::error::{PartitionError, SolveFailure};
use crate::partitioning::graph_traits::PartitionableGraph;
use crate::partitioning::{Capacity, PartitionId, PartitionStrategy};

/// The constraint-optimisation formulation handed to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutModel {
    pub num_nodes: usize,
    pub num_partitions: usize,
    pub max_per_partition: usize,
    /// Directed edges; each contributes one unit of cost when cut.
    pub edges: Vec<(NodeId, NodeId)>,
    /// Optional `(node, partition)` fixing.
    pub pin: Option<(NodeId, PartitionId)>,
}

impl CutModel {
    /// Reads the edges of `graph` into a model.
    ///
    /// With `pin_first_to_zero`, node 0 is fixed to partition 0 (symmetry
    /// breaking only; it does not change the optimal cost).
    ///
    /// # Errors
    /// `OutOfRangeNode` if the graph reports an edge leaving its domain.
    pub fn build<G>(
        graph: &G,
        capacity: Capacity,
        pin_first_to_zero: bool,
    ) -> Result<Self, PartitionError>
    where
        G: PartitionableGraph + ?Sized,
    {
        let num_nodes = graph.num_vertices();
        let mut edges = Vec::with_capacity(graph.num_edges()?);
        for u in graph.vertices() {
            for &v in graph.neighbors(u)? {
                if !graph.contains(v) {
                    return Err(PartitionError::OutOfRangeNode { node: v, num_nodes });
                }
                edges.push((u, v));
            }
        }
        Ok(Self {
            num_nodes,
            num_partitions: capacity.num_partitions,
            max_per_partition: capacity.max_per_partition,
            edges,
            pin: (pin_first_to_zero && num_nodes > 0).then_some((0, 0)),
        })
    }

    /// Whether the capacity rows alone already rule out every assignment.
    pub fn capacity_shortfall(&self) -> bool {
        self.num_partitions.saturating_mul(self.max_per_partition) < self.num_nodes
            || self
                .pin
                .is_some_and(|(v, p)| v >= self.num_nodes || p >= self.num_partitions)
    }

    /// Objective value of `labels`: the number of cut edges.
    pub fn cut_cost(&self, labels: &[PartitionId]) -> usize {
        self.edges
            .iter()
            .filter(|&&(u, v)| labels.get(u) != labels.get(v))
            .count()
    }

    /// Checks `labels` against every constraint of the model.
    pub fn check(&self, labels: &[PartitionId]) -> Result<(), SolveFailure> {
        if labels.len() != self.num_nodes {
            return Err(SolveFailure::InconsistentModel(format!(
                "{} labels for {} nodes",
                labels.len(),
                self.num_nodes
            )));
        }
        let mut loads = vec![0usize; self.num_partitions];
        for (v, &p) in labels.iter().enumerate() {
            let load = loads.get_mut(p).ok_or_else(|| {
                SolveFailure::InconsistentModel(format!(
                    "node {v} on partition {p}, only {} exist",
                    self.num_partitions
                ))
            })?;
            *load += 1;
        }
        if let Some((p, &load)) = loads
            .iter()
            .enumerate()
            .find(|&(_, &l)| l > self.max_per_partition)
        {
            return Err(SolveFailure::InconsistentModel(format!(
                "partition {p} holds {load} nodes, capacity is {}",
                self.max_per_partition
            )));
        }
        if let Some((v, p)) = self.pin {
            if labels[v] != p {
                return Err(SolveFailure::InconsistentModel(format!(
                    "node {v} pinned to partition {p} but placed on {}",
                    labels[v]
                )));
            }
        }
        Ok(())
    }
}

/// A constraint-optimisation backend able to solve a [`CutModel`].
///
/// `solve` returns one partition label per node. The budget is advisory:
/// backends with a native timeout should honour it, but the caller enforces
/// it either way.
pub trait ExactOptimizer: Send + Sync {
    /// Short backend name, used in strategy names and logs.
    fn name(&self) -> &str;

    /// Minimises the model's cut cost subject to its constraints.
    fn solve(
        &self,
        model: &CutModel,
        budget: Option<Duration>,
    ) -> Result<Vec<PartitionId>, SolveFailure>;
}

/// Exact strategy: formulation, bounded solve, verified decode.
#[derive(Clone)]
pub struct ExactPartitioner {
    optimizer: Arc<dyn ExactOptimizer>,
    name: String,
    pin_first_to_zero: bool,
    time_budget: Option<Duration>,
}

impl std::fmt::Debug for ExactPartitioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactPartitioner")
            .field("optimizer", &self.optimizer.name())
            .field("pin_first_to_zero", &self.pin_first_to_zero)
            .field("time_budget", &self.time_budget)
            .finish()
    }
}

impl ExactPartitioner {
    /// Pinning on, no time budget.
    pub fn new<O: ExactOptimizer + 'static>(optimizer: O) -> Self {
        Self::from_shared(Arc::new(optimizer))
    }

    pub fn from_shared(optimizer: Arc<dyn ExactOptimizer>) -> Self {
        let name = format!("exact-{}", optimizer.name());
        Self {
            optimizer,
            name,
            pin_first_to_zero: true,
            time_budget: None,
        }
    }

    pub fn pin_first_to_zero(mut self, pin: bool) -> Self {
        self.pin_first_to_zero = pin;
        self
    }

    /// Bounds the wall-clock time of each solve.
    ///
    /// On expiry the caller gets `NoSolutionFound(TimedOut)` right away, but
    /// the worker thread is not interrupted: a backend without a native
    /// timeout (such as [`MilpOptimizer`]) keeps its core busy until the solve
    /// ends, and its result is then discarded.
    pub fn time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Builds the model for `graph`, solves it, and decodes the answer.
    ///
    /// # Errors
    /// `NoSolutionFound` when the model is unsatisfiable, the backend fails,
    /// the budget expires, or the answer violates the model.
    pub fn run<G>(
        &self,
        graph: &G,
        capacity: Capacity,
    ) -> Result<PartitionAssignment, PartitionError>
    where
        G: PartitionableGraph + ?Sized,
    {
        let model = CutModel::build(graph, capacity, self.pin_first_to_zero)?;
        if model.num_nodes == 0 {
            return Ok(PartitionAssignment::from_groups(vec![
                Vec::new();
                model.num_partitions
            ]));
        }
        if model.capacity_shortfall() {
            return Err(SolveFailure::Unsatisfiable.into());
        }
        log::debug!(
            "{}: {} nodes, {} partitions (cap {}), {} edges, pin {:?}",
            self.name,
            model.num_nodes,
            model.num_partitions,
            model.max_per_partition,
            model.edges.len(),
            model.pin
        );

        let model = Arc::new(model);
        let started = Instant::now();
        let labels = solve_within_budget(&self.optimizer, &model, self.time_budget)
            .inspect_err(|e| log::warn!("{}: {e}", self.name))?;
        model
            .check(&labels)
            .inspect_err(|e| log::warn!("{}: {e}", self.name))?;
        log::debug!(
            "{}: optimum {} cut edges in {:?}",
            self.name,
            model.cut_cost(&labels),
            started.elapsed()
        );
        for (v, p) in labels.iter().enumerate() {
            log::trace!("{}: node {v} -> partition {p}", self.name);
        }
        PartitionAssignment::from_labels(&labels, model.num_partitions)
    }
}

impl PartitionStrategy for ExactPartitioner {
    fn name(&self) -> &str {
        &self.name
    }

    fn partition(
        &self,
        graph: &dyn PartitionableGraph,
        capacity: Capacity,
    ) -> Result<PartitionAssignment, PartitionError> {
        self.run(graph, capacity)
    }
}

/// Runs the solve, on a worker thread when a budget applies.
///
/// On expiry the worker is abandoned; its eventual result is dropped with the
/// channel. A panicking backend is a `Solver` failure on both paths.
fn solve_within_budget(
    optimizer: &Arc<dyn ExactOptimizer>,
    model: &Arc<CutModel>,
    budget: Option<Duration>,
) -> Result<Vec<PartitionId>, SolveFailure> {
    let Some(budget) = budget else {
        return panic::catch_unwind(AssertUnwindSafe(|| optimizer.solve(model, None)))
            .unwrap_or_else(|_| Err(SolveFailure::Solver("solver panicked".into())));
    };

    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(optimizer);
    let worker_model = Arc::clone(model);
    thread::Builder::new()
        .name(format!("exact-{}", optimizer.name()))
        .spawn(move || {
            // The receiver is gone if the caller already timed out.
            let _ = tx.send(worker.solve(&worker_model, Some(budget)));
        })
        .map_err(|e| SolveFailure::Solver(format!("cannot start solver thread: {e}")))?;

    match rx.recv_timeout(budget) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(SolveFailure::TimedOut { budget }),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(SolveFailure::Solver(
            "solver thread ended without a result".into(),
        )),
    }
}
