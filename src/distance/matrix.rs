//! Dense distance matrix.

use crate::error::{Error, Result};
use crate::models::NodeSet;

/// Largest relative difference allowed between `d[i][j]` and `d[j][i]`.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A dense n×n distance matrix stored in row-major order.
///
/// Built once per problem instance and never mutated afterwards; derived
/// matrices (normalized, reduced) are new values.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::NodeSet;
/// use u_qtsp::distance::DistanceMatrix;
///
/// let nodes = NodeSet::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]).unwrap();
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!((dm.max_distance() - 10.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the symmetric Euclidean distance matrix of a node set.
    pub fn from_nodes(nodes: &NodeSet) -> Self {
        let points = nodes.nodes();
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_to(&points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { data, size: n }
    }

    /// Creates a distance matrix from an explicit row-major n×n grid.
    ///
    /// Fails if `size == 0`, the data length doesn't match `size * size`, any
    /// entry is negative or non-finite, a diagonal entry is nonzero, or
    /// `d[i][j]` and `d[j][i]` differ by more than [`SYMMETRY_TOLERANCE`]
    /// (relative to the larger of the two, or absolute below 1).
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_argument("distance matrix must have at least one node"));
        }
        if data.len() != size * size {
            return Err(Error::size_mismatch("distance matrix entries", size * size, data.len()));
        }
        if let Some(k) = data.iter().position(|d| !d.is_finite() || *d < 0.0) {
            return Err(Error::invalid_argument(format!(
                "distance ({}, {}) must be finite and non-negative, got {}",
                k / size,
                k % size,
                data[k]
            )));
        }
        if let Some(i) = (0..size).find(|&i| data[i * size + i] != 0.0) {
            return Err(Error::invalid_argument(format!(
                "distance ({i}, {i}) must be 0, got {}",
                data[i * size + i]
            )));
        }
        for i in 0..size {
            for j in (i + 1)..size {
                let (a, b) = (data[i * size + j], data[j * size + i]);
                if (a - b).abs() > SYMMETRY_TOLERANCE * a.max(b).max(1.0) {
                    return Err(Error::invalid_argument(format!(
                        "distance ({i}, {j}) = {a} differs from ({j}, {i}) = {b}"
                    )));
                }
            }
        }
        Ok(Self { data, size })
    }

    /// Creates a distance matrix from nested rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(Error::size_mismatch("distance matrix row length", size, row.len()));
            }
            data.extend_from_slice(row);
        }
        Self::from_data(size, data)
    }

    /// Returns the distance from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest entry (0 for a single node).
    pub fn max_distance(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Returns a copy scaled so that the largest entry is 1.
    ///
    /// A matrix whose entries are all zero is returned unchanged.
    pub fn normalized(&self) -> Self {
        let max = self.max_distance();
        if max <= 0.0 {
            return self.clone();
        }
        Self {
            data: self.data.iter().map(|d| d / max).collect(),
            size: self.size,
        }
    }

    /// Returns a copy with row and column `node` removed.
    pub(crate) fn without_node(&self, node: usize) -> Self {
        let n = self.size;
        let mut data = Vec::with_capacity((n - 1) * (n - 1));
        for i in (0..n).filter(|&i| i != node) {
            for j in (0..n).filter(|&j| j != node) {
                data.push(self.get(i, j));
            }
        }
        Self { data, size: n - 1 }
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }
}
