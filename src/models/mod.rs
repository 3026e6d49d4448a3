//! Domain model types for the travelling salesman problem.
//!
//! Provides planar nodes, node sets (random or supplied), and tours as
//! validated permutations of node indices.

mod node;
mod tour;

pub use node::{Node, NodeSet, COORDINATE_RANGE};
pub use tour::{is_permutation, Tour};
