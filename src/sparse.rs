//! Sparse adjacency rows.
//!
//! The graph is stored in compressed-row form: `offsets[i]..offsets[i + 1]`
//! indexes the ascending column list of row `i`. Entries carry an explicit
//! value so restricted copies can share the same layout; for an input graph
//! every value is `1.0`.
//!
//! A [`SparseGraph`] is immutable once built. The only derived structure is a
//! restriction to a subset of rows and columns, used when a group is divided.

use crate::error::{Error, Result};
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

/// Sentinel for "vertex not in the current group" in a position map.
pub(crate) const UNMAPPED: usize = usize::MAX;

/// Immutable sparse adjacency matrix in compressed-row layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseGraph {
    offsets: Vec<usize>,
    columns: Vec<usize>,
    values: Vec<f64>,
}

impl SparseGraph {
    /// Build a graph from per-vertex neighbor lists.
    ///
    /// `rows[i]` lists the neighbors of vertex `i`. Lists are sorted and
    /// deduplicated on entry; symmetry is the caller's contract and is not
    /// checked.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNeighbor`] if a neighbor index is `>= rows.len()`.
    pub fn from_rows<R: AsRef<[usize]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        for (vertex, row) in rows.iter().enumerate() {
            if let Some(&neighbor) = row.as_ref().iter().find(|&&neighbor| neighbor >= n) {
                return Err(Error::InvalidNeighbor { vertex, neighbor });
            }
        }
        Ok(Self::assemble(rows))
    }

    /// Build a graph from a petgraph undirected graph.
    ///
    /// Parallel edges collapse to a single entry; a self-loop becomes one
    /// diagonal entry.
    pub fn from_petgraph<N, E>(graph: &UnGraph<N, E>) -> Self {
        let mut rows: Vec<Vec<usize>> = vec![Vec::new(); graph.node_count()];
        for edge in graph.edge_references() {
            let i = edge.source().index();
            let j = edge.target().index();
            rows[i].push(j);
            if i != j {
                rows[j].push(i);
            }
        }
        Self::assemble(&rows)
    }

    /// Lay out in-range rows as CSR, sorting and deduplicating each.
    fn assemble<R: AsRef<[usize]>>(rows: &[R]) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut columns = Vec::new();
        offsets.push(0);

        for row in rows {
            let start = columns.len();
            columns.extend_from_slice(row.as_ref());
            let row = &mut columns[start..];
            row.sort_unstable();
            let kept = dedup_sorted(row);
            columns.truncate(start + kept);
            offsets.push(columns.len());
        }

        let values = vec![1.0; columns.len()];
        Self {
            offsets,
            columns,
            values,
        }
    }

    /// Number of vertices (rows).
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// True if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.columns.len()
    }

    /// Ascending column indices of row `i`.
    pub fn row(&self, i: usize) -> &[usize] {
        &self.columns[self.offsets[i]..self.offsets[i + 1]]
    }

    fn row_values(&self, i: usize) -> &[f64] {
        &self.values[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Degree of vertex `i` (length of its neighbor list).
    pub fn degree(&self, i: usize) -> usize {
        self.offsets[i + 1] - self.offsets[i]
    }

    /// Sum of all degrees (`M`, twice the number of undirected edges).
    pub fn total_degree(&self) -> usize {
        self.nnz()
    }

    /// `out = A·v`.
    pub fn mul_vec(&self, v: &[f64], out: &mut [f64]) {
        for (i, slot) in out.iter_mut().enumerate().take(self.len()) {
            *slot = self
                .row(i)
                .iter()
                .zip(self.row_values(i))
                .map(|(&col, &value)| value * v[col])
                .sum();
        }
    }

    /// Materialize row `i` into a dense buffer of length `len()`.
    pub fn row_into(&self, i: usize, dense: &mut [f64]) {
        dense.iter_mut().for_each(|x| *x = 0.0);
        for (&col, &value) in self.row(i).iter().zip(self.row_values(i)) {
            dense[col] = value;
        }
    }

    /// Sum of the entries of row `i`.
    pub fn row_sum(&self, i: usize) -> f64 {
        self.row_values(i).iter().sum()
    }

    /// Iterate `(column, value)` pairs of row `i`.
    pub(crate) fn entries(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row(i)
            .iter()
            .copied()
            .zip(self.row_values(i).iter().copied())
    }

    /// Restrict to the rows and columns listed in `members`, re-indexed to
    /// `0..members.len()` in member order.
    ///
    /// `position` is a caller-owned map of length `len()` that must hold
    /// [`UNMAPPED`] everywhere on entry; it is restored before returning.
    /// Members must be distinct.
    pub(crate) fn restrict(&self, members: &[usize], position: &mut [usize]) -> Self {
        for (local, &vertex) in members.iter().enumerate() {
            position[vertex] = local;
        }

        let mut offsets = Vec::with_capacity(members.len() + 1);
        let mut columns = Vec::new();
        let mut values = Vec::new();
        offsets.push(0);

        for &vertex in members {
            let start = columns.len();
            for (col, value) in self.entries(vertex) {
                let local = position[col];
                if local != UNMAPPED {
                    columns.push(local);
                    values.push(value);
                }
            }
            // Member order need not follow vertex order, so keep rows ascending.
            if !columns[start..].windows(2).all(|w| w[0] < w[1]) {
                let mut pairs: Vec<(usize, f64)> = columns[start..]
                    .iter()
                    .copied()
                    .zip(values[start..].iter().copied())
                    .collect();
                pairs.sort_unstable_by_key(|&(col, _)| col);
                for (k, (col, value)) in pairs.into_iter().enumerate() {
                    columns[start + k] = col;
                    values[start + k] = value;
                }
            }
            offsets.push(columns.len());
        }

        for &vertex in members {
            position[vertex] = UNMAPPED;
        }

        Self {
            offsets,
            columns,
            values,
        }
    }
}

/// Remove consecutive duplicates in place, returning the kept length.
fn dedup_sorted(row: &mut [usize]) -> usize {
    if row.is_empty() {
        return 0;
    }
    let mut kept = 1;
    for i in 1..row.len() {
        if row[i] != row[kept - 1] {
            row[kept] = row[i];
            kept += 1;
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path3() -> SparseGraph {
        // 0 - 1 - 2
        SparseGraph::from_rows(&[vec![1], vec![0, 2], vec![1]]).unwrap()
    }

    #[test]
    fn test_from_rows_sorts_and_dedups() {
        let g = SparseGraph::from_rows(&[vec![2, 1, 1], vec![0], vec![0]]).unwrap();
        assert_eq!(g.row(0), &[1, 2]);
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.total_degree(), 4);
    }

    #[test]
    fn test_from_rows_rejects_out_of_range() {
        let err = SparseGraph::from_rows(&[vec![1], vec![5]]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidNeighbor {
                vertex: 1,
                neighbor: 5
            }
        );
    }

    #[test]
    fn test_mul_vec() {
        let g = path3();
        let mut out = vec![0.0; 3];
        g.mul_vec(&[1.0, 2.0, 3.0], &mut out);
        assert_eq!(out, vec![2.0, 4.0, 2.0]);
    }

    #[test]
    fn test_row_into_and_row_sum() {
        let g = path3();
        let mut dense = vec![9.0; 3];
        g.row_into(1, &mut dense);
        assert_eq!(dense, vec![1.0, 0.0, 1.0]);
        assert_eq!(g.row_sum(1), 2.0);
        assert_eq!(g.row_sum(0), 1.0);
    }

    #[test]
    fn test_restrict_reindexes_and_restores_position_map() {
        let g = path3();
        let mut position = vec![UNMAPPED; 3];
        let sub = g.restrict(&[1, 2], &mut position);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.row(0), &[1]);
        assert_eq!(sub.row(1), &[0]);
        assert!(position.iter().all(|&p| p == UNMAPPED));
    }

    #[test]
    fn test_restrict_unordered_members_keeps_rows_ascending() {
        // Triangle, members listed in reverse.
        let g = SparseGraph::from_rows(&[vec![1, 2], vec![0, 2], vec![0, 1]]).unwrap();
        let mut position = vec![UNMAPPED; 3];
        let sub = g.restrict(&[2, 1, 0], &mut position);
        assert_eq!(sub.row(0), &[1, 2]);
        assert_eq!(sub.row(2), &[0, 1]);
    }

    #[test]
    fn test_from_petgraph() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        let _ = graph.add_edge(a, b, ());
        let _ = graph.add_edge(b, a, ());
        let _ = graph.add_edge(b, c, ());

        let g = SparseGraph::from_petgraph(&graph);
        assert_eq!(g.row(0), &[1]);
        assert_eq!(g.row(1), &[0, 2]);
        assert_eq!(g.total_degree(), 4);
    }

    #[test]
    fn test_from_petgraph_keeps_isolated_vertices_and_loops() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let _ = graph.add_node(());
        let _ = graph.add_edge(a, b, ());
        let _ = graph.add_edge(b, b, ());

        let g = SparseGraph::from_petgraph(&graph);
        assert_eq!(g.len(), 3);
        assert_eq!(g.row(1), &[0, 1]);
        assert!(g.row(2).is_empty());
        assert_eq!(g.total_degree(), 3);
    }
}
