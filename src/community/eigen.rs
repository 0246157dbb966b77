//! Power iteration for the leading eigenpair of a modularity operator.
//!
//! Power iteration converges to the eigenvector whose eigenvalue is largest
//! in *magnitude*. The leading-eigenvector method needs the *algebraically*
//! largest eigenvalue of `B̂`, which may be smaller in magnitude than a very
//! negative one. Shifting by the 1-norm `c ≥ ρ(B̂)` fixes that: every
//! eigenvalue of `B̂ + c·I` is non-negative, and their order is unchanged.
//!
//! ```text
//! v_{t+1} = (B̂ + cI)·v_t / ‖(B̂ + cI)·v_t‖
//! λ = v·(B̂ + cI)·v / v·v − c
//! ```

use super::modularity::{dot, ModularityOperator};
use super::scratch::ScratchPool;
use crate::error::{Error, Result};
use rand::{Rng, RngCore};

/// Leading eigenvalue and the work it took to find it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenPair {
    /// Eigenvalue of the unshifted operator.
    pub value: f64,
    /// Number of full power-iteration steps.
    pub iterations: usize,
}

/// Power-iteration eigensolver.
#[derive(Debug, Clone)]
pub struct PowerIteration {
    /// Per-component convergence threshold.
    tolerance: f64,
    /// Elementwise update budget per vertex before giving up.
    max_updates_per_vertex: usize,
}

impl PowerIteration {
    /// Solver with a `1e-4` tolerance and a budget of 150 000 updates per
    /// vertex.
    pub fn new() -> Self {
        Self {
            tolerance: 1e-4,
            max_updates_per_vertex: 150_000,
        }
    }

    /// Set the per-component convergence threshold.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the elementwise update budget per vertex.
    pub fn with_max_updates_per_vertex(mut self, budget: usize) -> Self {
        self.max_updates_per_vertex = budget;
        self
    }

    /// Find the leading eigenpair of `op + shift·I`.
    ///
    /// The eigenvector is left in `scratch.eigenvector(op.len())`; the
    /// returned eigenvalue has the shift removed.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for a zero-dimensional operator.
    /// - [`Error::DivisionByZero`] if an iterate has zero norm.
    /// - [`Error::ConvergenceFailure`] once more than
    ///   `max_updates_per_vertex·n + 1` elementwise updates were made.
    pub fn solve(
        &self,
        op: &ModularityOperator,
        shift: f64,
        scratch: &mut ScratchPool,
        rng: &mut dyn RngCore,
    ) -> Result<EigenPair> {
        let n = op.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if scratch.capacity() < n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: scratch.capacity(),
            });
        }

        let budget = self
            .max_updates_per_vertex
            .saturating_mul(n)
            .saturating_add(1);
        let ScratchPool {
            eigenvector,
            product,
            ..
        } = scratch;
        let v = &mut eigenvector[..n];
        let num = &mut product[..n];

        for x in v.iter_mut() {
            *x = rng.random::<f64>();
        }

        let mut updates = 0usize;
        let mut iterations = 0usize;
        loop {
            if updates > budget {
                return Err(Error::ConvergenceFailure { iterations });
            }
            op.apply(v, num, shift);
            let denom = dot(num, num).sqrt();
            if denom == 0.0 {
                return Err(Error::DivisionByZero);
            }

            let mut moving = false;
            for (x, &y) in v.iter_mut().zip(num.iter()) {
                let next = y / denom;
                if !moving && (*x - next).abs() > self.tolerance {
                    moving = true;
                }
                *x = next;
            }
            updates += n;
            iterations += 1;

            if !moving {
                break;
            }
        }

        let value = rayleigh_quotient(op, v, shift, num)? - shift;
        log::trace!("power iteration converged: n={n} iterations={iterations} value={value:.6}");
        Ok(EigenPair { value, iterations })
    }
}

impl Default for PowerIteration {
    fn default() -> Self {
        Self::new()
    }
}

/// `v·(op + shift·I)·v / v·v`.
fn rayleigh_quotient(
    op: &ModularityOperator,
    v: &[f64],
    shift: f64,
    out: &mut [f64],
) -> Result<f64> {
    let denom = dot(v, v);
    if denom == 0.0 {
        return Err(Error::DivisionByZero);
    }
    Ok(op.quadratic_form(v, shift, out) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseGraph;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_pairs() -> ModularityOperator {
        let g = SparseGraph::from_rows(&[vec![1], vec![0], vec![3], vec![2]]).unwrap();
        ModularityOperator::new(&g).unwrap()
    }

    #[test]
    fn test_recovers_known_eigenvalue() {
        // Spectrum of B: {1, 0, -1, -1}.
        let op = two_pairs();
        let shift = op.max_abs_row_sum();
        let mut scratch = ScratchPool::new(4);
        let mut rng = StdRng::seed_from_u64(7);

        let pair = PowerIteration::new()
            .solve(&op, shift, &mut scratch, &mut rng)
            .unwrap();
        assert!((pair.value - 1.0).abs() < 1e-3, "value = {}", pair.value);

        // Eigenvector is ±(1, 1, -1, -1)/2.
        let u = scratch.eigenvector(4);
        assert!(u[0] * u[1] > 0.0);
        assert!(u[2] * u[3] > 0.0);
        assert!(u[0] * u[2] < 0.0);
    }

    #[test]
    fn test_single_edge_has_zero_leading_eigenvalue() {
        // B = [[-½, ½], [½, -½]], spectrum {0, -1}.
        let g = SparseGraph::from_rows(&[vec![1], vec![0]]).unwrap();
        let op = ModularityOperator::new(&g).unwrap();
        let mut scratch = ScratchPool::new(2);
        let mut rng = StdRng::seed_from_u64(1);

        let pair = PowerIteration::new()
            .solve(&op, op.max_abs_row_sum(), &mut scratch, &mut rng)
            .unwrap();
        assert!(pair.value.abs() < 1e-3);
    }

    #[test]
    fn test_budget_exhaustion_is_convergence_failure() {
        let op = two_pairs();
        let mut scratch = ScratchPool::new(4);
        let mut rng = StdRng::seed_from_u64(3);

        let err = PowerIteration::new()
            .with_max_updates_per_vertex(0)
            .solve(&op, op.max_abs_row_sum(), &mut scratch, &mut rng)
            .unwrap_err();
        assert_eq!(err, Error::ConvergenceFailure { iterations: 1 });
    }

    #[test]
    fn test_zero_operator_is_division_by_zero() {
        // 2 and 3 are isolated: B restricted to {2, 3} is identically zero.
        let g = SparseGraph::from_rows(&[vec![1], vec![0], vec![], vec![]]).unwrap();
        let op = ModularityOperator::new(&g).unwrap();
        let mut scratch = ScratchPool::new(4);
        let sub = op.restrict(&[2, 3], &mut scratch);
        assert_eq!(sub.max_abs_row_sum(), 0.0);

        let mut rng = StdRng::seed_from_u64(5);
        let err = PowerIteration::new()
            .solve(&sub, 0.0, &mut scratch, &mut rng)
            .unwrap_err();
        assert_eq!(err, Error::DivisionByZero);
    }

    #[test]
    fn test_same_seed_same_result() {
        let op = two_pairs();
        let shift = op.max_abs_row_sum();
        let mut a = ScratchPool::new(4);
        let mut b = ScratchPool::new(4);
        let pa = PowerIteration::new()
            .solve(&op, shift, &mut a, &mut StdRng::seed_from_u64(11))
            .unwrap();
        let pb = PowerIteration::new()
            .solve(&op, shift, &mut b, &mut StdRng::seed_from_u64(11))
            .unwrap();
        assert_eq!(pa, pb);
        assert_eq!(a.eigenvector(4), b.eigenvector(4));
    }
}
