//! Sparse quadratic objective over binary variables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::encoding::OneHotAssignment;
use crate::error::{Error, Result};

/// One stored coefficient. `i <= j`; `i == j` is a linear term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuboTerm {
    pub i: usize,
    pub j: usize,
    pub coefficient: f64,
}

/// `sum coeff[a,b] * x_a * x_b` over `x ∈ {0,1}^k`.
///
/// Pairs are stored once under the canonical key `(min, max)`, so the
/// coefficient for `(a, b)` and `(b, a)` is the same entry. Additions to an
/// existing pair accumulate. Missing pairs have coefficient 0.
///
/// `offset` is a constant the sampler never sees; `energy + offset` is the
/// value of the un-expanded penalty formulation.
///
/// # Examples
///
/// ```
/// use u_qtsp::qubo::QuadraticObjective;
///
/// let mut q = QuadraticObjective::new(2);
/// q.add(1, 0, 3.0);
/// q.add(0, 1, 2.0);
/// q.add(0, 0, -1.0);
/// assert_eq!(q.coefficient(1, 0), 5.0);
/// assert_eq!(q.energy(&[1, 1]).unwrap(), 4.0);
/// assert_eq!(q.energy(&[1, 0]).unwrap(), -1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticObjective {
    num_variables: usize,
    terms: BTreeMap<(usize, usize), f64>,
    offset: f64,
}

impl QuadraticObjective {
    /// An objective over `num_variables` binaries with no terms.
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            terms: BTreeMap::new(),
            offset: 0.0,
        }
    }

    /// Adds `coefficient` to the pair `(a, b)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is not below `num_variables`; use
    /// [`try_add`](Self::try_add) for indices that come from outside.
    pub fn add(&mut self, a: usize, b: usize, coefficient: f64) {
        assert!(
            a < self.num_variables && b < self.num_variables,
            "variable pair ({a}, {b}) out of range for {} variables",
            self.num_variables
        );
        *self.terms.entry((a.min(b), a.max(b))).or_insert(0.0) += coefficient;
    }

    /// Checked [`add`](Self::add): fails if either index is out of range or
    /// `coefficient` is not finite, leaving the objective unchanged.
    pub fn try_add(&mut self, a: usize, b: usize, coefficient: f64) -> Result<()> {
        if let Some(v) = [a, b].into_iter().find(|&v| v >= self.num_variables) {
            return Err(Error::invalid_argument(format!(
                "variable {v} out of range for {} variables",
                self.num_variables
            )));
        }
        if !coefficient.is_finite() {
            return Err(Error::invalid_argument(format!(
                "coefficient for ({a}, {b}) must be finite, got {coefficient}"
            )));
        }
        self.add(a, b, coefficient);
        Ok(())
    }

    /// Adds to the constant offset.
    pub fn add_offset(&mut self, value: f64) {
        self.offset += value;
    }

    /// Coefficient of the pair `(a, b)`, 0 if absent.
    pub fn coefficient(&self, a: usize, b: usize) -> f64 {
        self.terms
            .get(&(a.min(b), a.max(b)))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of stored pairs.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Stored terms in ascending `(i, j)` order.
    pub fn iter(&self) -> impl Iterator<Item = QuboTerm> + '_ {
        self.terms.iter().map(|(&(i, j), &coefficient)| QuboTerm { i, j, coefficient })
    }

    /// Stored terms as an owned list, the form handed across the sampler boundary.
    pub fn to_terms(&self) -> Vec<QuboTerm> {
        self.iter().collect()
    }

    /// Largest absolute coefficient (0 if there are no terms).
    pub fn max_abs_coefficient(&self) -> f64 {
        self.terms.values().fold(0.0, |m, c| m.max(c.abs()))
    }

    /// Objective value (without offset) at a 0/1 vector.
    ///
    /// Fails if `bits` has the wrong length or holds a value other than 0 or 1.
    pub fn energy(&self, bits: &[u8]) -> Result<f64> {
        if bits.len() != self.num_variables {
            return Err(Error::size_mismatch(
                "bit vector length",
                self.num_variables,
                bits.len(),
            ));
        }
        if let Some(k) = bits.iter().position(|&b| b > 1) {
            return Err(Error::invalid_argument(format!(
                "bit {k} has value {}, expected 0 or 1",
                bits[k]
            )));
        }
        Ok(self.energy_unchecked(|k| bits[k] == 1))
    }

    /// Objective value (without offset) at an assignment.
    pub fn energy_of(&self, assignment: &OneHotAssignment) -> Result<f64> {
        if assignment.len() != self.num_variables {
            return Err(Error::size_mismatch(
                "assignment size",
                self.num_variables,
                assignment.len(),
            ));
        }
        let bits = assignment.as_bools();
        Ok(self.energy_unchecked(|k| bits[k]))
    }

    pub(crate) fn energy_unchecked(&self, active: impl Fn(usize) -> bool) -> f64 {
        self.terms
            .iter()
            .filter(|((i, j), _)| active(*i) && active(*j))
            .map(|(_, &c)| c)
            .sum()
    }
}
