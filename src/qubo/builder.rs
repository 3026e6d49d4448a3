//! TSP objective construction.
//!
//! # Formulation
//!
//! Variable `x[t * n + i]` is 1 when node `i` is visited at time `t`. The
//! objective is the sum of three groups:
//!
//! ```text
//! cost:      A · Σ_t Σ_{i≠j} d[i][j] · x[t,i] · x[t+1 mod n, j]
//! per time:  B · Σ_t (Σ_i x[t,i] - 1)²
//! per node:  B · Σ_i (Σ_t x[t,i] - 1)²
//! ```
//!
//! Each penalty square expands, for binary `x`, to `-B` on every diagonal
//! and `+2B` on every unordered pair of the group, plus a constant `B` that
//! is kept in [`QuadraticObjective::offset`]. Diagonals receive
//! contributions from both constraint groups; they add.
//!
//! The fixed-start variant drops the start node and time slot 0. Travel
//! to and from the start node becomes linear: `A · d[start][r]` on the first
//! remaining slot and `A · d[r][start]` on the last one.

use crate::distance::DistanceMatrix;
use crate::encoding::ReductionContext;
use crate::error::Result;

use super::{ObjectiveConfig, QuadraticObjective};

/// Builds TSP objectives from a distance matrix.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::{NodeSet, Tour};
/// use u_qtsp::distance::DistanceMatrix;
/// use u_qtsp::encoding::encode_order;
/// use u_qtsp::qubo::{ObjectiveBuilder, ObjectiveConfig};
///
/// let nodes = NodeSet::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]).unwrap();
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let config = ObjectiveConfig::default().with_normalize_distances(false).with_cost_weight(1.0);
/// let q = ObjectiveBuilder::new(config).unwrap().build(&dm).unwrap();
/// assert_eq!(q.num_variables(), 9);
///
/// let bits = encode_order(&[0, 1, 2]).unwrap();
/// let perimeter = 2.0 + 2f64.sqrt();
/// assert!((q.energy_of(&bits).unwrap() + q.offset() - perimeter).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ObjectiveBuilder {
    config: ObjectiveConfig,
}

impl ObjectiveBuilder {
    /// Fails if the configuration does not validate.
    pub fn new(config: ObjectiveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ObjectiveConfig {
        &self.config
    }

    /// Objective over `n²` variables for an unconstrained tour.
    pub fn build(&self, distances: &DistanceMatrix) -> Result<QuadraticObjective> {
        let d = self.prepare(distances);
        let n = d.size();
        let mut q = QuadraticObjective::new(n * n);

        self.add_cyclic_cost_terms(&mut q, &d);
        self.add_time_constraints(&mut q, n);
        self.add_position_constraints(&mut q, n);

        self.log_built("full", &q, distances);
        Ok(q)
    }

    /// Objective over `(n-1)²` variables for tours that begin at `start`.
    ///
    /// Variable `x[t * (n-1) + r]` means reduced node `r` occupies time slot
    /// `t + 1`; decode with [`ReductionContext`] to recover node numbering.
    pub fn build_fixed_start(
        &self,
        distances: &DistanceMatrix,
        start: usize,
    ) -> Result<QuadraticObjective> {
        let ctx = ReductionContext::new(start, distances.size())?;
        let d = self.prepare(distances);
        let reduced = ctx.reduced_distances(&d)?;
        let m = ctx.reduced_size();
        let mut q = QuadraticObjective::new(m * m);

        self.add_path_cost_terms(&mut q, &reduced);
        self.add_start_terms(&mut q, &ctx.start_costs(&d)?, &ctx.return_costs(&d)?);
        self.add_time_constraints(&mut q, m);
        self.add_position_constraints(&mut q, m);

        self.log_built("fixed-start", &q, distances);
        Ok(q)
    }

    fn prepare(&self, distances: &DistanceMatrix) -> DistanceMatrix {
        if self.config.normalize_distances {
            distances.normalized()
        } else {
            distances.clone()
        }
    }

    /// Consecutive-time pairs including the wrap from slot `n-1` back to 0.
    fn add_cyclic_cost_terms(&self, q: &mut QuadraticObjective, d: &DistanceMatrix) {
        let n = d.size();
        for t in 0..n {
            self.add_transition(q, d, t, (t + 1) % n);
        }
    }

    /// Consecutive-time pairs without wrap-around.
    fn add_path_cost_terms(&self, q: &mut QuadraticObjective, d: &DistanceMatrix) {
        let m = d.size();
        for t in 1..m {
            self.add_transition(q, d, t - 1, t);
        }
    }

    fn add_transition(&self, q: &mut QuadraticObjective, d: &DistanceMatrix, from: usize, to: usize) {
        let n = d.size();
        for i in 0..n {
            for j in (0..n).filter(|&j| j != i) {
                q.add(from * n + i, to * n + j, self.config.cost_weight * d.get(i, j));
            }
        }
    }

    /// Linear travel cost from the start node into slot 0 and from the last
    /// slot back to the start node.
    fn add_start_terms(&self, q: &mut QuadraticObjective, outbound: &[f64], inbound: &[f64]) {
        let m = outbound.len();
        for r in 0..m {
            q.add(r, r, self.config.cost_weight * outbound[r]);
            let last = (m - 1) * m + r;
            q.add(last, last, self.config.cost_weight * inbound[r]);
        }
    }

    /// Exactly one node per time slot.
    fn add_time_constraints(&self, q: &mut QuadraticObjective, n: usize) {
        for t in 0..n {
            let group: Vec<usize> = (0..n).map(|i| t * n + i).collect();
            self.add_one_hot_penalty(q, &group);
        }
    }

    /// Exactly one time slot per node.
    fn add_position_constraints(&self, q: &mut QuadraticObjective, n: usize) {
        for i in 0..n {
            let group: Vec<usize> = (0..n).map(|t| t * n + i).collect();
            self.add_one_hot_penalty(q, &group);
        }
    }

    /// `B · (Σ x - 1)²` over `group`.
    fn add_one_hot_penalty(&self, q: &mut QuadraticObjective, group: &[usize]) {
        let b = self.config.penalty_weight;
        for (k, &a) in group.iter().enumerate() {
            q.add(a, a, -b);
            for &c in &group[k + 1..] {
                q.add(a, c, 2.0 * b);
            }
        }
        q.add_offset(b);
    }

    fn log_built(&self, kind: &str, q: &QuadraticObjective, distances: &DistanceMatrix) {
        log::debug!(
            "built {kind} objective: n={} variables={} terms={}",
            distances.size(),
            q.num_variables(),
            q.num_terms()
        );
        if !self.config.is_penalty_dominant(distances) {
            log::debug!(
                "penalty_weight {} below dominance bound for n={}",
                self.config.penalty_weight,
                distances.size()
            );
        }
    }
}
