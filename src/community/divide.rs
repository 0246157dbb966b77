//! Division of one group into two.

use super::eigen::PowerIteration;
use super::modularity::ModularityOperator;
use super::refine::Refiner;
use super::scratch::ScratchPool;
use crate::error::Result;
use rand::RngCore;

/// Outcome of dividing a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Division {
    /// No split improves modularity; the division vector is all `+1`.
    Indivisible,
    /// The group splits along the ±1 division vector.
    Split {
        /// Leading eigenvalue of the restricted operator.
        eigenvalue: f64,
        /// Modularity contribution `½·sᵀB̂s` of the refined split.
        modularity: f64,
    },
}

impl Division {
    /// True for [`Division::Split`].
    pub fn is_split(&self) -> bool {
        matches!(self, Division::Split { .. })
    }
}

/// Per-group driver: spectral bisection followed by refinement.
#[derive(Debug, Clone)]
pub struct Divider {
    solver: PowerIteration,
    refiner: Refiner,
    /// Eigenvalue and modularity must exceed this to count as positive.
    tolerance: f64,
}

impl Divider {
    /// Divider with default solver, refiner and a `1e-4` tolerance.
    pub fn new() -> Self {
        Self {
            solver: PowerIteration::new(),
            refiner: Refiner::new(),
            tolerance: 1e-4,
        }
    }

    /// Replace the eigensolver.
    pub fn with_solver(mut self, solver: PowerIteration) -> Self {
        self.solver = solver;
        self
    }

    /// Replace the refiner.
    pub fn with_refiner(mut self, refiner: Refiner) -> Self {
        self.refiner = refiner;
        self
    }

    /// Set the positivity tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Divide `members` of the graph behind `root`.
    ///
    /// The division vector is written to `scratch.division(members.len())`:
    /// `+1` for the first subgroup, `-1` for the second, all `+1` when the
    /// group is indivisible.
    pub fn divide(
        &self,
        root: &ModularityOperator,
        members: &[usize],
        scratch: &mut ScratchPool,
        rng: &mut dyn RngCore,
    ) -> Result<Division> {
        let n = members.len();
        let restricted = root.restrict(members, scratch);
        let one_norm = restricted.max_abs_row_sum();

        // B̂ is identically zero: its leading eigenvalue is 0.
        if one_norm == 0.0 {
            scratch.division[..n].fill(1.0);
            return Ok(Division::Indivisible);
        }

        let pair = self.solver.solve(&restricted, one_norm, scratch, rng)?;
        if pair.value <= self.tolerance {
            scratch.division[..n].fill(1.0);
            return Ok(Division::Indivisible);
        }

        let ScratchPool {
            eigenvector,
            product,
            division,
            eligible,
            applied,
            ..
        } = &mut *scratch;
        let s = &mut division[..n];
        sign_split(&eigenvector[..n], s);

        let refinement = self.refiner.refine_with(&restricted, s, eligible, applied);
        let modularity = restricted.modularity(s, product);
        log::trace!(
            "refined split of {n}: {} rounds, gain {:.6}, dQ {modularity:.6}",
            refinement.rounds,
            refinement.gain
        );

        if modularity <= self.tolerance {
            scratch.division[..n].fill(1.0);
            return Ok(Division::Indivisible);
        }

        Ok(Division::Split {
            eigenvalue: pair.value,
            modularity,
        })
    }
}

/// `s_i = +1` where `u_i > 0`, else `-1`; an exact zero goes to `-1`.
fn sign_split(u: &[f64], s: &mut [f64]) {
    for (s, &u) in s.iter_mut().zip(u) {
        *s = if u > 0.0 { 1.0 } else { -1.0 };
    }
}

impl Default for Divider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseGraph;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bridged_cliques() -> SparseGraph {
        SparseGraph::from_rows(&[
            vec![1, 2, 3],
            vec![0, 2, 3],
            vec![0, 1, 3],
            vec![0, 1, 2, 4],
            vec![3, 5, 6, 7],
            vec![4, 6, 7],
            vec![4, 5, 7],
            vec![4, 5, 6],
        ])
        .unwrap()
    }

    #[test]
    fn test_sign_split_sends_zero_to_second_group() {
        let mut s = [0.0; 4];
        sign_split(&[0.0, 1e-300, -0.0, -2.0], &mut s);
        assert_eq!(s, [-1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_splits_bridged_cliques() {
        let root = ModularityOperator::new(&bridged_cliques()).unwrap();
        let mut scratch = ScratchPool::new(8);
        let mut rng = StdRng::seed_from_u64(42);
        let members: Vec<usize> = (0..8).collect();

        let division = Divider::new()
            .divide(&root, &members, &mut scratch, &mut rng)
            .unwrap();
        assert!(division.is_split());
        if let Division::Split {
            eigenvalue,
            modularity,
        } = division
        {
            assert!(eigenvalue > 0.0);
            assert!(modularity > 0.0);
        }

        let s = scratch.division(8);
        assert!(s[..4].iter().all(|&x| x == s[0]));
        assert!(s[4..].iter().all(|&x| x == -s[0]));
    }

    #[test]
    fn test_clique_is_indivisible() {
        let root = ModularityOperator::new(&bridged_cliques()).unwrap();
        let mut scratch = ScratchPool::new(8);
        let mut rng = StdRng::seed_from_u64(42);

        let division = Divider::new()
            .divide(&root, &[0, 1, 2, 3], &mut scratch, &mut rng)
            .unwrap();
        assert_eq!(division, Division::Indivisible);
        assert!(scratch.division(4).iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_isolated_vertices_are_indivisible() {
        let g = SparseGraph::from_rows(&[vec![1], vec![0], vec![], vec![]]).unwrap();
        let root = ModularityOperator::new(&g).unwrap();
        let mut scratch = ScratchPool::new(4);
        let mut rng = StdRng::seed_from_u64(0);

        let division = Divider::new()
            .divide(&root, &[2, 3], &mut scratch, &mut rng)
            .unwrap();
        assert_eq!(division, Division::Indivisible);
    }

    #[test]
    fn test_refined_split_beats_sign_split() {
        let root = ModularityOperator::new(&bridged_cliques()).unwrap();
        let members: Vec<usize> = (0..8).collect();
        let mut scratch = ScratchPool::new(8);

        // Sign split taken straight from the eigenvector.
        let restricted = root.restrict(&members, &mut scratch);
        let shift = restricted.max_abs_row_sum();
        let _ = PowerIteration::new()
            .solve(&restricted, shift, &mut scratch, &mut StdRng::seed_from_u64(9))
            .unwrap();
        let sign: Vec<f64> = scratch
            .eigenvector(8)
            .iter()
            .map(|&u| if u > 0.0 { 1.0 } else { -1.0 })
            .collect();
        let mut out = vec![0.0; 8];
        let initial = restricted.modularity(&sign, &mut out);

        let division = Divider::new()
            .divide(&root, &members, &mut scratch, &mut StdRng::seed_from_u64(9))
            .unwrap();
        match division {
            Division::Split { modularity, .. } => assert!(modularity >= initial - 1e-12),
            Division::Indivisible => panic!("bridged cliques should split"),
        }
    }
}
