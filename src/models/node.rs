//! Node coordinates and node sets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Side length of the square that random nodes are drawn from.
pub const COORDINATE_RANGE: f64 = 10.0;

/// A point in the plane.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::Node;
///
/// let a = Node::new(0.0, 0.0);
/// let b = Node::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    x: f64,
    y: f64,
}

impl Node {
    /// Creates a node at the given coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An ordered, immutable set of nodes. Index `i` is node `i` everywhere else
/// in the crate.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::NodeSet;
///
/// let a = NodeSet::generate(5, Some(42)).unwrap();
/// let b = NodeSet::generate(5, Some(42)).unwrap();
/// assert_eq!(a, b);
/// assert!(a.nodes().iter().all(|n| (0.0..10.0).contains(&n.x())));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSet {
    nodes: Vec<Node>,
}

impl NodeSet {
    /// Draws `n` nodes uniformly from `[0, 10) × [0, 10)`.
    ///
    /// A `seed` makes the draw reproducible. Fails if `n < 1`.
    pub fn generate(n: usize, seed: Option<u64>) -> Result<Self> {
        if n < 1 {
            return Err(Error::invalid_argument(format!(
                "node count must be at least 1, got {n}"
            )));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let nodes = (0..n)
            .map(|_| {
                let x = rng.random::<f64>() * COORDINATE_RANGE;
                let y = rng.random::<f64>() * COORDINATE_RANGE;
                Node::new(x, y)
            })
            .collect();
        log::debug!("generated {n} nodes (seed={seed:?})");
        Ok(Self { nodes })
    }

    /// Builds a node set from externally supplied coordinates.
    ///
    /// Fails if `points` is empty or any coordinate is non-finite.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::invalid_argument("node set must not be empty"));
        }
        if let Some(i) = points
            .iter()
            .position(|&(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(Error::invalid_argument(format!(
                "node {i} has a non-finite coordinate: {:?}",
                points[i]
            )));
        }
        Ok(Self {
            nodes: points.iter().map(|&(x, y)| Node::new(x, y)).collect(),
        })
    }

    /// The nodes, in index order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes (always at least 1).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a node set holds at least one node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_distance_symmetric() {
        let a = Node::new(1.0, 2.0);
        let b = Node::new(4.0, 6.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
    }

    #[test]
    fn test_generate_in_range() {
        let set = NodeSet::generate(50, Some(7)).expect("valid");
        assert_eq!(set.len(), 50);
        for n in set.nodes() {
            assert!(n.x() >= 0.0 && n.x() < COORDINATE_RANGE);
            assert!(n.y() >= 0.0 && n.y() < COORDINATE_RANGE);
        }
    }

    #[test]
    fn test_generate_seeded_reproducible() {
        let a = NodeSet::generate(4, Some(5406)).expect("valid");
        let b = NodeSet::generate(4, Some(5406)).expect("valid");
        let c = NodeSet::generate(4, Some(5407)).expect("valid");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_unseeded() {
        let set = NodeSet::generate(3, None).expect("valid");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_generate_zero_rejected() {
        assert!(matches!(
            NodeSet::generate(0, Some(1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_points() {
        let set = NodeSet::from_points(&[(0.0, 0.0), (1.0, 1.0)]).expect("valid");
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert_eq!(set.nodes()[1], Node::new(1.0, 1.0));
    }

    #[test]
    fn test_from_points_invalid() {
        assert!(NodeSet::from_points(&[]).is_err());
        assert!(NodeSet::from_points(&[(0.0, f64::NAN)]).is_err());
    }
}
