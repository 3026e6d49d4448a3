//! Exact brute-force baseline.
//!
//! - [`solve`] — optimal closed tour over all `n!` orders
//! - [`solve_from`] — optimal tour with a fixed first node
//! - [`tour_cost`] — closed-tour length, shared with sample scoring

mod brute_force;

pub use brute_force::{solve, solve_from, tour_cost, Permutations};
