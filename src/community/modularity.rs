//! Implicit modularity matrix.
//!
//! The modularity matrix of a graph is
//!
//! ```text
//! B = A - k·kᵀ / M
//! ```
//!
//! where `A` is the adjacency matrix, `k` the degree vector and `M = Σ k_i`.
//! It is dense even when `A` is sparse, so it is never built. Everything the
//! bisection needs is expressed through matrix-vector products with the
//! sparse `A` plus a rank-one correction.
//!
//! ## Restriction to a group
//!
//! When a group `g` is divided further, the relevant operator is `B̂[g]`: the
//! rows and columns of `B` for members of `g`, with the diagonal shifted by
//!
//! ```text
//! f_i = Σ_{j ∈ g} B[g]_ij
//! ```
//!
//! so every row of `B̂[g]` sums to zero. With that shift `½·sᵀB̂[g]s` is the
//! modularity gained by splitting `g` along `s`, not the modularity of the
//! whole graph. `M` stays the total degree of the full graph.

use super::scratch::ScratchPool;
use crate::error::{Error, Result};
use crate::sparse::SparseGraph;

/// Matrix-free modularity operator `B̂ = A - k·kᵀ/M - diag(f)`.
#[derive(Debug, Clone)]
pub struct ModularityOperator {
    adjacency: SparseGraph,
    degrees: Vec<f64>,
    /// `M` of the full graph.
    total_degree: f64,
    /// Sum of member degrees.
    degree_sum: f64,
    /// Per-member diagonal shift `f_i`.
    diag: Vec<f64>,
}

impl ModularityOperator {
    /// Operator for the whole graph (`f ≡ 0`).
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if the graph has no edges.
    pub fn new(graph: &SparseGraph) -> Result<Self> {
        let total = graph.total_degree();
        if total == 0 {
            return Err(Error::DivisionByZero);
        }
        let n = graph.len();
        let degrees: Vec<f64> = (0..n).map(|i| graph.degree(i) as f64).collect();
        Ok(Self {
            adjacency: graph.clone(),
            degrees,
            total_degree: total as f64,
            degree_sum: total as f64,
            diag: vec![0.0; n],
        })
    }

    /// Restrict to `members` (indices into this operator), computing the
    /// diagonal shift of the restricted matrix.
    pub fn restrict(&self, members: &[usize], scratch: &mut ScratchPool) -> Self {
        let adjacency = self.adjacency.restrict(members, &mut scratch.position);
        let degrees: Vec<f64> = members.iter().map(|&v| self.degrees[v]).collect();
        let degree_sum = degrees.iter().sum();

        let mut restricted = Self {
            adjacency,
            degrees,
            total_degree: self.total_degree,
            degree_sum,
            diag: vec![0.0; members.len()],
        };
        let diag: Vec<f64> = (0..members.len()).map(|i| restricted.row_sum(i)).collect();
        restricted.diag = diag;
        restricted
    }

    /// Dimension of the operator.
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    /// True for a zero-dimensional operator.
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Total degree `M` of the full graph.
    pub fn total_degree(&self) -> f64 {
        self.total_degree
    }

    /// Diagonal shift `f`.
    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    /// `out = (B̂ + shift·I)·v`.
    pub fn apply(&self, v: &[f64], out: &mut [f64], shift: f64) {
        let n = self.len();
        debug_assert!(v.len() >= n && out.len() >= n);
        let v = &v[..n];
        let out = &mut out[..n];

        let scale = dot(&self.degrees, v) / self.total_degree;
        self.adjacency.mul_vec(v, out);
        for i in 0..n {
            out[i] += -scale * self.degrees[i] + (shift - self.diag[i]) * v[i];
        }
    }

    /// Row `j` of `B̂` dotted with `s`, leaving out the `j`-th term.
    ///
    /// Flipping `s_j` alone changes `sᵀB̂s` by `-4·s_j·row_dot_excluding_self(s, j)`.
    pub fn row_dot_excluding_self(&self, s: &[f64], j: usize) -> f64 {
        let n = self.len();
        let adjacent: f64 = self
            .adjacency
            .entries(j)
            .filter(|&(col, _)| col != j)
            .map(|(col, value)| value * s[col])
            .sum();
        let k_dot = dot(&self.degrees, &s[..n]) - self.degrees[j] * s[j];
        adjacent - (self.degrees[j] / self.total_degree) * k_dot
    }

    /// Signed sum of row `i` of `B̂`.
    pub fn row_sum(&self, i: usize) -> f64 {
        self.adjacency.row_sum(i)
            - self.degrees[i] * self.degree_sum / self.total_degree
            - self.diag[i]
    }

    /// Sum of absolute values of row `i` of `B̂`.
    pub fn row_abs_sum(&self, i: usize) -> f64 {
        let k_i = self.degrees[i];
        let mut entries = self.adjacency.entries(i).peekable();
        let mut sum = 0.0;
        for j in 0..self.len() {
            let mut a_ij = 0.0;
            if let Some(&(col, value)) = entries.peek() {
                if col == j {
                    a_ij = value;
                    let _ = entries.next();
                }
            }
            let mut b_ij = a_ij - k_i * self.degrees[j] / self.total_degree;
            if j == i {
                b_ij -= self.diag[i];
            }
            sum += b_ij.abs();
        }
        sum
    }

    /// Largest absolute row sum (the matrix 1-norm, `B̂` being symmetric).
    ///
    /// Bounds the spectral radius, so `B̂ + max_abs_row_sum()·I` has no
    /// negative eigenvalues. Zero when every entry is zero.
    pub fn max_abs_row_sum(&self) -> f64 {
        (0..self.len())
            .map(|i| self.row_abs_sum(i))
            .fold(0.0, f64::max)
    }

    /// `vᵀ(B̂ + shift·I)v`, using `out` as the product buffer.
    pub fn quadratic_form(&self, v: &[f64], shift: f64, out: &mut [f64]) -> f64 {
        self.apply(v, out, shift);
        dot(&v[..self.len()], &out[..self.len()])
    }

    /// Modularity contribution `½·sᵀB̂s` of dividing along `s`.
    pub fn modularity(&self, s: &[f64], out: &mut [f64]) -> f64 {
        0.5 * self.quadratic_form(s, 0.0, out)
    }
}

/// Dot product of two equal-length slices.
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Modularity `Q` of a finished partition of `graph`.
///
/// ```text
/// Q = Σ_c [ L_c / M - (D_c / M)² ]
/// ```
///
/// where `L_c` counts adjacency entries inside community `c` (each edge
/// twice) and `D_c` is its degree sum. Communities must be disjoint.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if the graph has no edges;
/// [`Error::DimensionMismatch`] if a community lists a vertex out of range.
pub fn modularity_score(graph: &SparseGraph, communities: &[Vec<usize>]) -> Result<f64> {
    let total = graph.total_degree();
    if total == 0 {
        return Err(Error::DivisionByZero);
    }
    let m = total as f64;
    let n = graph.len();

    let mut label = vec![usize::MAX; n];
    for (c, community) in communities.iter().enumerate() {
        for &v in community {
            if v >= n {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: v + 1,
                });
            }
            label[v] = c;
        }
    }

    let mut q = 0.0;
    for (c, community) in communities.iter().enumerate() {
        let mut internal = 0usize;
        let mut degree_sum = 0usize;
        for &v in community {
            degree_sum += graph.degree(v);
            internal += graph.row(v).iter().filter(|&&u| label[u] == c).count();
        }
        let d = degree_sum as f64 / m;
        q += internal as f64 / m - d * d;
    }
    Ok(q)
}
