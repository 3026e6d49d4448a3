//! Quadratic objective construction for samplers.
//!
//! - [`QuadraticObjective`] — sparse symmetric pair → coefficient map
//! - [`ObjectiveBuilder`] — cost and one-hot penalty terms, full or fixed-start
//! - [`ObjectiveConfig`] — term weights

mod builder;
mod config;
mod objective;

pub use builder::ObjectiveBuilder;
pub use config::ObjectiveConfig;
pub use objective::{QuadraticObjective, QuboTerm};
