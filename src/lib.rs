//! # u-qtsp
//!
//! Quadratic unconstrained binary (QUBO) formulation of the Travelling
//! Salesman Problem: builds the objective a quantum annealer or variational
//! sampler minimizes, translates tours to and from one-hot bit vectors, and
//! decodes sampled states back into tours. An exact enumerator serves as the
//! correctness baseline.
//!
//! ## Modules
//!
//! - [`models`] — Node coordinates and validated tours
//! - [`distance`] — Distance matrix
//! - [`exact`] — Exhaustive permutation solver
//! - [`qubo`] — Objective construction (full and fixed-start)
//! - [`encoding`] — One-hot tour codec and fixed-start reduction
//! - [`sampling`] — Sampler boundary, sample records, decoded distributions
//! - [`pipeline`] — Objective → sampler → distribution in one call

pub mod distance;
pub mod encoding;
pub mod error;
pub mod exact;
pub mod models;
pub mod pipeline;
pub mod qubo;
pub mod sampling;

pub use error::{Error, Result};
