//! Fixed-start reduction.
//!
//! When the tour's first node is known, that node and time slot 0 carry no
//! information. The reduced problem covers the remaining `n - 1` nodes over
//! `n - 1` time slots, with node indices above the start shifted down by one.

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::models::Tour;

/// Bidirectional mapping between full tours over `n` nodes and reduced
/// orders over the `n - 1` non-start nodes.
///
/// # Examples
///
/// ```
/// use u_qtsp::encoding::ReductionContext;
/// use u_qtsp::models::Tour;
///
/// let ctx = ReductionContext::new(1, 4).unwrap();
/// let tour = Tour::new(vec![1, 3, 0, 2]).unwrap();
/// let reduced = ctx.reduce(&tour).unwrap();
/// assert_eq!(reduced, vec![2, 0, 1]);
/// assert_eq!(ctx.expand(&reduced).unwrap(), vec![1, 3, 0, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionContext {
    start_node: usize,
    n: usize,
}

impl ReductionContext {
    /// Fails if `n < 1` or `start_node >= n`.
    pub fn new(start_node: usize, n: usize) -> Result<Self> {
        if n < 1 {
            return Err(Error::invalid_argument(format!(
                "node count must be at least 1, got {n}"
            )));
        }
        if start_node >= n {
            return Err(Error::invalid_argument(format!(
                "starting node {start_node} out of range [0, {n})"
            )));
        }
        Ok(Self { start_node, n })
    }

    pub fn start_node(&self) -> usize {
        self.start_node
    }

    /// Number of nodes in the full problem.
    pub fn node_count(&self) -> usize {
        self.n
    }

    /// Number of nodes (and time slots) in the reduced problem.
    pub fn reduced_size(&self) -> usize {
        self.n - 1
    }

    /// Reduced index of a non-start node.
    #[inline]
    pub fn to_reduced(&self, node: usize) -> usize {
        if node > self.start_node {
            node - 1
        } else {
            node
        }
    }

    /// Original index of a reduced node.
    #[inline]
    pub fn to_original(&self, reduced: usize) -> usize {
        if reduced >= self.start_node {
            reduced + 1
        } else {
            reduced
        }
    }

    /// Drops the start node from a tour and renumbers the rest.
    ///
    /// Fails if the tour has the wrong length or does not begin at the start node.
    pub fn reduce(&self, tour: &Tour) -> Result<Vec<usize>> {
        if tour.len() != self.n {
            return Err(Error::size_mismatch("tour length", self.n, tour.len()));
        }
        if tour.start() != self.start_node {
            return Err(Error::invalid_argument(format!(
                "tour starts at node {}, expected starting node {}",
                tour.start(),
                self.start_node
            )));
        }
        Ok(tour.order()[1..]
            .iter()
            .map(|&node| self.to_reduced(node))
            .collect())
    }

    /// Renumbers a reduced order and re-inserts the start node at position 0.
    ///
    /// The input is not required to be a permutation, so degenerate sampler
    /// output survives expansion with its defects intact.
    pub fn expand(&self, reduced: &[usize]) -> Result<Vec<usize>> {
        if reduced.len() != self.reduced_size() {
            return Err(Error::size_mismatch(
                "reduced order length",
                self.reduced_size(),
                reduced.len(),
            ));
        }
        let mut full = Vec::with_capacity(self.n);
        full.push(self.start_node);
        full.extend(reduced.iter().map(|&r| self.to_original(r)));
        Ok(full)
    }

    /// Distances among the non-start nodes, in reduced numbering.
    pub fn reduced_distances(&self, distances: &DistanceMatrix) -> Result<DistanceMatrix> {
        self.check_matrix(distances)?;
        Ok(distances.without_node(self.start_node))
    }

    /// Distance from the start node to each reduced node.
    pub fn start_costs(&self, distances: &DistanceMatrix) -> Result<Vec<f64>> {
        self.check_matrix(distances)?;
        Ok((0..self.reduced_size())
            .map(|r| distances.get(self.start_node, self.to_original(r)))
            .collect())
    }

    /// Distance from each reduced node back to the start node.
    pub fn return_costs(&self, distances: &DistanceMatrix) -> Result<Vec<f64>> {
        self.check_matrix(distances)?;
        Ok((0..self.reduced_size())
            .map(|r| distances.get(self.to_original(r), self.start_node))
            .collect())
    }

    fn check_matrix(&self, distances: &DistanceMatrix) -> Result<()> {
        if distances.size() != self.n {
            return Err(Error::size_mismatch("distance matrix size", self.n, distances.size()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert!(ReductionContext::new(0, 1).is_ok());
        assert!(ReductionContext::new(3, 3).is_err());
        assert!(ReductionContext::new(0, 0).is_err());
    }

    #[test]
    fn test_index_shift() {
        let ctx = ReductionContext::new(2, 5).expect("valid");
        assert_eq!(ctx.reduced_size(), 4);
        assert_eq!(ctx.to_reduced(1), 1);
        assert_eq!(ctx.to_reduced(3), 2);
        assert_eq!(ctx.to_original(1), 1);
        assert_eq!(ctx.to_original(2), 3);
        assert_eq!(ctx.to_original(3), 4);
    }

    #[test]
    fn test_reduce_requires_start() {
        let ctx = ReductionContext::new(0, 3).expect("valid");
        let tour = Tour::new(vec![1, 0, 2]).expect("valid");
        assert!(ctx.reduce(&tour).is_err());
        let short = Tour::new(vec![0, 1]).expect("valid");
        assert!(matches!(ctx.reduce(&short), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_expand_start_zero() {
        let ctx = ReductionContext::new(0, 4).expect("valid");
        assert_eq!(ctx.expand(&[2, 0, 1]).expect("len"), vec![0, 3, 1, 2]);
        assert!(ctx.expand(&[0, 1]).is_err());
    }

    #[test]
    fn test_expand_keeps_duplicates() {
        let ctx = ReductionContext::new(1, 3).expect("valid");
        assert_eq!(ctx.expand(&[0, 0]).expect("len"), vec![1, 0, 0]);
    }

    #[test]
    fn test_distance_helpers() {
        let dm = DistanceMatrix::from_rows(&[
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ])
        .expect("valid");
        let ctx = ReductionContext::new(1, 3).expect("valid");
        let reduced = ctx.reduced_distances(&dm).expect("size");
        assert_eq!(reduced.get(0, 1), 2.0);
        assert_eq!(ctx.start_costs(&dm).expect("size"), vec![1.0, 3.0]);
        assert_eq!(ctx.return_costs(&dm).expect("size"), vec![1.0, 3.0]);

        let other = ReductionContext::new(0, 4).expect("valid");
        assert!(other.start_costs(&dm).is_err());
    }
}
