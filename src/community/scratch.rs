//! Reusable work buffers for a partitioning run.

use crate::sparse::UNMAPPED;

/// Buffers sized once to the vertex count and reused by every division.
///
/// A division only ever touches the first `group.len()` entries of each
/// buffer, so one pool serves the whole run without reallocating.
#[derive(Debug, Clone)]
pub struct ScratchPool {
    /// Power-iteration vector; holds the converged eigenvector afterwards.
    pub(crate) eigenvector: Vec<f64>,
    /// Operator output (`B̂·v`).
    pub(crate) product: Vec<f64>,
    /// ±1 division vector of the group being divided.
    pub(crate) division: Vec<f64>,
    /// Refiner: vertices not yet moved in the current round.
    pub(crate) eligible: Vec<bool>,
    /// Refiner: `(slot, vertex)` flips in the order they were applied.
    pub(crate) applied: Vec<(usize, usize)>,
    /// Vertex -> local index map used when restricting the graph.
    pub(crate) position: Vec<usize>,
}

impl ScratchPool {
    /// Allocate buffers for a graph with `n` vertices.
    pub fn new(n: usize) -> Self {
        Self {
            eigenvector: vec![0.0; n],
            product: vec![0.0; n],
            division: vec![0.0; n],
            eligible: vec![false; n],
            applied: Vec::with_capacity(n),
            position: vec![UNMAPPED; n],
        }
    }

    /// Vertex count the pool was sized for.
    pub fn capacity(&self) -> usize {
        self.eigenvector.len()
    }

    /// Division vector produced by the last division of a group of size `len`.
    pub fn division(&self, len: usize) -> &[f64] {
        &self.division[..len]
    }

    /// Eigenvector produced by the last power iteration over `len` entries.
    pub fn eigenvector(&self, len: usize) -> &[f64] {
        &self.eigenvector[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_sized_once() {
        let pool = ScratchPool::new(5);
        assert_eq!(pool.capacity(), 5);
        assert_eq!(pool.division(3).len(), 3);
        assert!(pool.applied.capacity() >= 5);
        assert!(pool.position.iter().all(|&p| p == UNMAPPED));
    }
}
