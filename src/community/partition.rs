//! Recursive bisection driver.
//!
//! Starting from one group holding every vertex, groups are popped from a
//! pending stack and divided. A group that cannot be split is final; the two
//! halves of a split go back on the pending stack, except singletons which
//! are final immediately. Every split strictly shrinks the groups involved,
//! so at most `n - 1` splits happen.

use super::divide::{Divider, Division};
use super::eigen::PowerIteration;
use super::modularity::ModularityOperator;
use super::refine::Refiner;
use super::scratch::ScratchPool;
use super::stack::{Group, GroupStack};
use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use crate::sparse::SparseGraph;
use petgraph::graph::UnGraph;
use rand::prelude::*;

/// Newman's leading-eigenvector community detection with refinement.
#[derive(Debug, Clone)]
pub struct LeadingEigenvector {
    /// Positivity threshold for eigenvalues, modularity and refinement gains.
    tolerance: f64,
    /// Per-component power-iteration convergence threshold.
    convergence: f64,
    /// Power-iteration update budget per vertex.
    max_updates_per_vertex: usize,
    /// Seed for the power-iteration start vectors.
    seed: Option<u64>,
}

impl LeadingEigenvector {
    /// Create a detector with default settings.
    pub fn new() -> Self {
        Self {
            tolerance: 1e-4,
            convergence: 1e-4,
            max_updates_per_vertex: 150_000,
            seed: None,
        }
    }

    /// Set the positivity threshold.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the power-iteration convergence threshold.
    pub fn with_convergence(mut self, convergence: f64) -> Self {
        self.convergence = convergence;
        self
    }

    /// Set the power-iteration update budget per vertex.
    pub fn with_max_updates_per_vertex(mut self, budget: usize) -> Self {
        self.max_updates_per_vertex = budget;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                message: "must be finite and non-negative",
            });
        }
        if !self.convergence.is_finite() || self.convergence <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "convergence",
                message: "must be finite and positive",
            });
        }
        if self.max_updates_per_vertex == 0 {
            return Err(Error::InvalidParameter {
                name: "max_updates_per_vertex",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    fn divider(&self) -> Divider {
        Divider::new()
            .with_solver(
                PowerIteration::new()
                    .with_tolerance(self.convergence)
                    .with_max_updates_per_vertex(self.max_updates_per_vertex),
            )
            .with_refiner(Refiner::new().with_tolerance(self.tolerance))
            .with_tolerance(self.tolerance)
    }

    /// Partition `graph` into indivisible communities.
    ///
    /// Communities come back in the order they are popped from the finished
    /// stack; members keep the order they had in their parent group.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for a graph without vertices.
    /// - [`Error::DivisionByZero`] if the graph has no edges (and more than
    ///   one vertex).
    /// - [`Error::ConvergenceFailure`] if power iteration runs out of budget.
    /// - [`Error::InvalidParameter`] for a bad configuration.
    pub fn partition(&self, graph: &SparseGraph) -> Result<Vec<Group>> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.partition_with_rng(graph, &mut *rng)
    }

    /// Like [`partition`](Self::partition), drawing start vectors from `rng`.
    pub fn partition_with_rng(
        &self,
        graph: &SparseGraph,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Group>> {
        self.validate()?;
        let n = graph.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if n == 1 {
            return Ok(vec![vec![0]]);
        }

        let root = ModularityOperator::new(graph)?;
        let divider = self.divider();
        let mut scratch = ScratchPool::new(n);

        let mut pending = GroupStack::new();
        let mut done = GroupStack::new();
        pending.push((0..n).collect());
        log::debug!("partitioning n={n} M={}", graph.total_degree());

        while let Some(group) = pending.pop() {
            let division = divider.divide(&root, &group, &mut scratch, rng)?;

            let mut first = Vec::with_capacity(group.len());
            let mut second = Vec::with_capacity(group.len());
            for (&v, &s) in group.iter().zip(scratch.division(group.len())) {
                if s > 0.0 {
                    first.push(v);
                } else {
                    second.push(v);
                }
            }

            if first.is_empty() || second.is_empty() {
                log::debug!("group of {} is indivisible", group.len());
                done.push(group);
                continue;
            }

            if let Division::Split { modularity, .. } = division {
                log::debug!(
                    "split group of {} into {} + {} (dQ={modularity:.6})",
                    group.len(),
                    first.len(),
                    second.len()
                );
            }
            for part in [first, second] {
                if part.len() == 1 {
                    done.push(part);
                } else {
                    pending.push(part);
                }
            }
        }

        debug_assert_eq!(done.vertex_count(), n);
        log::debug!("found {} communities", done.len());
        Ok(done.into_groups())
    }
}

impl Default for LeadingEigenvector {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for LeadingEigenvector {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let sparse = SparseGraph::from_petgraph(graph);
        let communities = self.partition(&sparse)?;

        let mut labels = vec![0; sparse.len()];
        for (id, community) in communities.iter().enumerate() {
            for &v in community {
                labels[v] = id;
            }
        }
        Ok(labels)
    }
}
