//! Distance matrices.
//!
//! Provides a dense, immutable distance matrix derived from node coordinates
//! or supplied explicitly.

mod matrix;

pub use matrix::{DistanceMatrix, SYMMETRY_TOLERANCE};
