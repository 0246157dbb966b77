//! # cleave
//!
//! Community detection by recursive bisection: Newman's leading-eigenvector
//! method with Kernighan–Lin style refinement, run over a sparse graph
//! without ever forming the dense modularity matrix.
//!
//! The engine lives in [`community`]; [`sparse`] holds the adjacency
//! structure. The binary graph/community file codec is in [`io`] behind the
//! default `io` feature.

pub mod community;
/// Error types used across `cleave`.
pub mod error;
#[cfg(feature = "io")]
pub mod io;
pub mod sparse;

pub use community::{
    modularity_score, CommunityDetection, Divider, Division, EigenPair, Group, GroupStack,
    LeadingEigenvector, ModularityOperator, PowerIteration, Refinement, Refiner, ScratchPool,
};
pub use error::{Error, Result};
pub use sparse::SparseGraph;
