//! Objective weights.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};

/// Weights for the three term groups of the TSP objective.
///
/// The defaults are the constants the annealer formulation has been tuned
/// with: distances normalized to `[0, 1]`, cost weight 10, penalty 400.
///
/// For the penalty to dominate, a constraint violation must never pay for
/// itself in saved distance. A sufficient (conservative) condition is
/// `penalty_weight >= cost_weight * max_distance * n`; see
/// [`dominance_bound`](Self::dominance_bound). The builder does not enforce it.
///
/// # Examples
///
/// ```
/// use u_qtsp::qubo::ObjectiveConfig;
///
/// let config = ObjectiveConfig::default()
///     .with_cost_weight(1.0)
///     .with_penalty_weight(400.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.dominance_bound(1.0, 4), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveConfig {
    /// Multiplier on travel distance in the cost terms.
    pub cost_weight: f64,

    /// One-hot constraint penalty.
    pub penalty_weight: f64,

    /// Divide distances by their maximum before building cost terms.
    pub normalize_distances: bool,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            cost_weight: 10.0,
            penalty_weight: 400.0,
            normalize_distances: true,
        }
    }
}

impl ObjectiveConfig {
    pub fn with_cost_weight(mut self, w: f64) -> Self {
        self.cost_weight = w;
        self
    }

    pub fn with_penalty_weight(mut self, w: f64) -> Self {
        self.penalty_weight = w;
        self
    }

    pub fn with_normalize_distances(mut self, normalize: bool) -> Self {
        self.normalize_distances = normalize;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.cost_weight.is_finite() || self.cost_weight < 0.0 {
            return Err(Error::invalid_argument(format!(
                "cost_weight must be finite and non-negative, got {}",
                self.cost_weight
            )));
        }
        if !self.penalty_weight.is_finite() || self.penalty_weight <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "penalty_weight must be finite and positive, got {}",
                self.penalty_weight
            )));
        }
        Ok(())
    }

    /// `cost_weight * max_distance * n`.
    pub fn dominance_bound(&self, max_distance: f64, n: usize) -> f64 {
        self.cost_weight * max_distance * n as f64
    }

    /// Whether `penalty_weight` meets [`dominance_bound`](Self::dominance_bound)
    /// for these distances, after normalization if enabled.
    pub fn is_penalty_dominant(&self, distances: &DistanceMatrix) -> bool {
        let max = if self.normalize_distances && distances.max_distance() > 0.0 {
            1.0
        } else {
            distances.max_distance()
        };
        self.penalty_weight >= self.dominance_bound(max, distances.size())
    }
}
