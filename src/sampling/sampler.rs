//! Sampler boundary.
//!
//! A sampler receives a [`QuadraticObjective`] and returns weighted states
//! approximating its minimum. Annealing hardware and variational circuits
//! live outside this crate behind [`Sampler`]; [`ExhaustiveSampler`] is an
//! exact stand-in for small variable counts.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::qubo::QuadraticObjective;

use super::SampleRecord;

/// Per-call settings handed to a sampler.
///
/// Defaults are the annealer constants the formulation was tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealerSettings {
    /// Number of reads (samples) requested.
    pub num_reads: usize,

    /// Coupling strength for chains of physical qubits representing one
    /// logical variable. Ignored by samplers without an embedding step.
    pub chain_strength: f64,
}

impl Default for AnnealerSettings {
    fn default() -> Self {
        Self {
            num_reads: 1000,
            chain_strength: 800.0,
        }
    }
}

impl AnnealerSettings {
    pub fn with_num_reads(mut self, n: usize) -> Self {
        self.num_reads = n;
        self
    }

    pub fn with_chain_strength(mut self, s: f64) -> Self {
        self.chain_strength = s;
        self
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        if self.num_reads == 0 {
            return Err(Error::invalid_argument("num_reads must be at least 1"));
        }
        if !self.chain_strength.is_finite() || self.chain_strength <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "chain_strength must be finite and positive, got {}",
                self.chain_strength
            )));
        }
        Ok(())
    }
}

/// A black-box minimizer of quadratic binary objectives.
///
/// Implementations may block for a long time; timeouts and retries are
/// their own concern. Every returned record must have exactly
/// `objective.num_variables()` bits.
pub trait Sampler {
    fn sample(
        &self,
        objective: &QuadraticObjective,
        settings: &AnnealerSettings,
    ) -> Result<Vec<SampleRecord>>;
}

/// Evaluates every one of the `2^k` states and returns the `num_reads`
/// lowest, each with occurrence count 1.
///
/// Bit `v` of the enumeration counter is variable `v`. States of equal
/// energy keep enumeration order.
///
/// # Examples
///
/// ```
/// use u_qtsp::qubo::QuadraticObjective;
/// use u_qtsp::sampling::{AnnealerSettings, ExhaustiveSampler, Sampler};
///
/// let mut q = QuadraticObjective::new(2);
/// q.add(0, 0, -1.0);
/// q.add(1, 1, -1.0);
/// q.add(0, 1, 3.0);
/// let records = ExhaustiveSampler::default()
///     .sample(&q, &AnnealerSettings::default().with_num_reads(2))
///     .unwrap();
/// assert_eq!(records[0].bits(), &[1, 0]);
/// assert_eq!(records[1].bits(), &[0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct ExhaustiveSampler {
    max_variables: usize,
}

impl Default for ExhaustiveSampler {
    fn default() -> Self {
        Self { max_variables: 20 }
    }
}

impl ExhaustiveSampler {
    /// Refuse objectives with more than `max_variables` variables.
    pub fn with_max_variables(mut self, max_variables: usize) -> Self {
        self.max_variables = max_variables.min(usize::BITS as usize - 1);
        self
    }
}

impl Sampler for ExhaustiveSampler {
    fn sample(
        &self,
        objective: &QuadraticObjective,
        settings: &AnnealerSettings,
    ) -> Result<Vec<SampleRecord>> {
        settings.validate()?;
        let k = objective.num_variables();
        if k > self.max_variables {
            return Err(Error::invalid_argument(format!(
                "exhaustive sampling limited to {} variables, objective has {k}",
                self.max_variables
            )));
        }

        let mut states: Vec<(usize, f64)> = (0..1usize << k)
            .map(|code| (code, objective.energy_unchecked(|v| (code >> v) & 1 == 1)))
            .collect();
        states.sort_by(|a, b| a.1.total_cmp(&b.1));
        states.truncate(settings.num_reads);
        log::debug!(
            "exhaustive sampler: {k} variables, returning {} of {} states",
            states.len(),
            1usize << k
        );

        states
            .into_iter()
            .map(|(code, energy)| {
                let bits = (0..k).map(|v| ((code >> v) & 1) as u8).collect();
                SampleRecord::new(bits, energy, 1)
            })
            .collect()
    }
}
