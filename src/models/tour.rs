//! Tour permutations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Returns `true` if `order` contains every index in `0..order.len()` exactly once.
pub fn is_permutation(order: &[usize]) -> bool {
    let n = order.len();
    let mut seen = vec![false; n];
    for &node in order {
        if node >= n || seen[node] {
            return false;
        }
        seen[node] = true;
    }
    true
}

/// A closed tour: every node visited once, returning to `order[0]` at the end.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::Tour;
///
/// let tour = Tour::new(vec![2, 0, 1]).unwrap();
/// assert_eq!(tour.start(), 2);
/// assert_eq!(tour.rotated_to(0).unwrap().order(), &[0, 1, 2]);
/// assert!(Tour::new(vec![0, 0, 1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    /// Creates a tour, checking that `order` is a permutation of `0..order.len()`.
    pub fn new(order: Vec<usize>) -> Result<Self> {
        if order.is_empty() {
            return Err(Error::invalid_argument("tour must visit at least one node"));
        }
        if !is_permutation(&order) {
            return Err(Error::invalid_argument(format!(
                "{order:?} is not a permutation of 0..{}",
                order.len()
            )));
        }
        Ok(Self { order })
    }

    /// The identity tour `0, 1, ..., n-1`.
    pub fn identity(n: usize) -> Result<Self> {
        Self::new((0..n).collect())
    }

    /// Visit order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// First node of the tour.
    pub fn start(&self) -> usize {
        self.order[0]
    }

    /// Number of nodes visited.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The same cycle, rotated so that it begins at `node`.
    pub fn rotated_to(&self, node: usize) -> Result<Self> {
        let pos = self
            .order
            .iter()
            .position(|&v| v == node)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "node {node} out of range for tour of {} nodes",
                    self.order.len()
                ))
            })?;
        let mut order = self.order.clone();
        order.rotate_left(pos);
        Ok(Self { order })
    }

    /// The same cycle travelled in the opposite direction, keeping the start.
    pub fn reversed(&self) -> Self {
        let mut order = self.order.clone();
        order[1..].reverse();
        Self { order }
    }

    /// Consumes the tour, returning the visit order.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }
}

impl TryFrom<Vec<usize>> for Tour {
    type Error = Error;

    fn try_from(order: Vec<usize>) -> Result<Self> {
        Self::new(order)
    }
}

impl From<Tour> for Vec<usize> {
    fn from(tour: Tour) -> Self {
        tour.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[]));
        assert!(is_permutation(&[1, 0, 2]));
        assert!(!is_permutation(&[1, 1, 2]));
        assert!(!is_permutation(&[0, 3, 1]));
    }

    #[test]
    fn test_tour_new() {
        let t = Tour::new(vec![1, 2, 0]).expect("valid");
        assert_eq!(t.len(), 3);
        assert_eq!(t.start(), 1);
        assert!(!t.is_empty());
        assert!(Tour::new(vec![]).is_err());
        assert!(Tour::new(vec![0, 2]).is_err());
    }

    #[test]
    fn test_rotate_and_reverse() {
        let t = Tour::new(vec![0, 1, 2, 3]).expect("valid");
        assert_eq!(t.rotated_to(2).expect("in range").order(), &[2, 3, 0, 1]);
        assert_eq!(t.reversed().order(), &[0, 3, 2, 1]);
        assert!(t.rotated_to(9).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let t: Tour = serde_json::from_str("[2,0,1]").expect("valid tour");
        assert_eq!(t.order(), &[2, 0, 1]);
        assert!(serde_json::from_str::<Tour>("[0,0]").is_err());
        assert_eq!(serde_json::to_string(&t).expect("serialize"), "[2,0,1]");
    }
}
