//! Community detection by recursive spectral bisection.
//!
//! Given a graph, find groups of vertices that are densely connected inside
//! and sparsely connected to each other.
//!
//! ## The Modularity Objective
//!
//! Modularity Q compares the edges inside communities with the number
//! expected in a random graph with the same degree sequence:
//!
//! ```text
//! Q = (1/M) × Σ[A_ij - (k_i × k_j)/M] × δ(c_i, c_j)
//! ```
//!
//! Where:
//! - M = sum of all degrees (twice the number of edges)
//! - A_ij = 1 if i and j are adjacent
//! - k_i = degree of node i
//! - δ(c_i, c_j) = 1 if i and j are in same community
//!
//! ## Leading-Eigenvector Bisection (Newman 2006)
//!
//! For a split of the graph into two groups encoded as `s_i = ±1`,
//!
//! ```text
//! Q = (1/2M) × sᵀ B s,   B = A - k kᵀ / M
//! ```
//!
//! Relaxing `s` to real values, the best split follows the signs of the
//! eigenvector of B with the largest eigenvalue. If that eigenvalue is not
//! positive, no split improves Q and the group is a community.
//!
//! **Per group**:
//! 1. **Restrict**: build `B̂[g]` for the group (see [`ModularityOperator`])
//! 2. **Eigenvector**: shifted power iteration ([`PowerIteration`])
//! 3. **Refine**: Kernighan–Lin style single-vertex moves ([`Refiner`])
//! 4. **Decide**: keep the split only if it adds positive modularity
//!
//! **Overall** ([`LeadingEigenvector`]): groups are split until none can be
//! improved. The run is sequential and reuses one [`ScratchPool`] sized to
//! the graph, so peak memory stays O(n + nnz).
//!
//! ## Usage
//!
//! ```rust
//! use cleave::{LeadingEigenvector, SparseGraph};
//!
//! // Two triangles joined by the edge 2-3.
//! let graph = SparseGraph::from_rows(&[
//!     vec![1, 2],
//!     vec![0, 2],
//!     vec![0, 1, 3],
//!     vec![2, 4, 5],
//!     vec![3, 5],
//!     vec![3, 4],
//! ])
//! .unwrap();
//!
//! let communities = LeadingEigenvector::new()
//!     .with_seed(42)
//!     .partition(&graph)
//!     .unwrap();
//! assert_eq!(communities.len(), 2);
//! ```
//!
//! ## References
//!
//! - Newman (2006). "Modularity and community structure in networks."
//!   PNAS 103(23), 8577–8582.
//! - Kernighan & Lin (1970). "An efficient heuristic procedure for
//!   partitioning graphs."

mod divide;
mod eigen;
mod modularity;
mod partition;
mod refine;
mod scratch;
mod stack;
mod traits;

pub use divide::{Divider, Division};
pub use eigen::{EigenPair, PowerIteration};
pub use modularity::{modularity_score, ModularityOperator};
pub use partition::LeadingEigenvector;
pub use refine::{Refinement, Refiner};
pub use scratch::ScratchPool;
pub use stack::{Group, GroupStack};
pub use traits::CommunityDetection;
