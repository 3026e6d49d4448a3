//! Flat one-hot assignment matrices.

use crate::error::{Error, Result};

/// A square binary matrix indexed `[time_slot][node]`, stored flat in
/// row-major order: bit `time_slot * side + node`.
///
/// A valid assignment is a permutation matrix: exactly one active bit per
/// row and per column.
///
/// # Examples
///
/// ```
/// use u_qtsp::encoding::OneHotAssignment;
///
/// let a = OneHotAssignment::from_bits(&[0, 1, 1, 0]).unwrap();
/// assert_eq!(a.side(), 2);
/// assert!(a.get(0, 1));
/// assert!(a.is_permutation_matrix());
/// assert!(OneHotAssignment::from_bits(&[1, 0, 0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OneHotAssignment {
    bits: Vec<bool>,
    side: usize,
}

/// Returns `m` such that `m * m == len`, if one exists.
pub(crate) fn square_side(len: usize) -> Option<usize> {
    let m = (len as f64).sqrt().round() as usize;
    (m * m == len).then_some(m)
}

impl OneHotAssignment {
    /// An all-zero `side × side` assignment.
    pub fn zeros(side: usize) -> Self {
        Self {
            bits: vec![false; side * side],
            side,
        }
    }

    /// Reads a flat 0/1 vector whose length is a perfect square.
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        let side = square_side(bits.len()).ok_or_else(|| {
            Error::invalid_argument(format!(
                "bit vector length {} is not a perfect square",
                bits.len()
            ))
        })?;
        if let Some(i) = bits.iter().position(|&b| b > 1) {
            return Err(Error::invalid_argument(format!(
                "bit {i} has value {}, expected 0 or 1",
                bits[i]
            )));
        }
        Ok(Self {
            bits: bits.iter().map(|&b| b == 1).collect(),
            side,
        })
    }

    /// Flat index of `(time_slot, node)`.
    #[inline]
    pub fn index(&self, time_slot: usize, node: usize) -> usize {
        time_slot * self.side + node
    }

    /// Whether `node` is active at `time_slot`.
    pub fn get(&self, time_slot: usize, node: usize) -> bool {
        self.bits[self.index(time_slot, node)]
    }

    pub fn set(&mut self, time_slot: usize, node: usize, active: bool) {
        let i = self.index(time_slot, node);
        self.bits[i] = active;
    }

    /// Matrix side (number of time slots, equal to number of nodes).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of bits (`side²`).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// One row (time slot).
    pub fn row(&self, time_slot: usize) -> &[bool] {
        &self.bits[time_slot * self.side..(time_slot + 1) * self.side]
    }

    /// Number of active bits.
    pub fn count_active(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// `true` if every row and every column has exactly one active bit.
    pub fn is_permutation_matrix(&self) -> bool {
        let m = self.side;
        (0..m).all(|t| self.row(t).iter().filter(|&&b| b).count() == 1)
            && (0..m).all(|node| (0..m).filter(|&t| self.get(t, node)).count() == 1)
    }

    /// Flat bits.
    pub fn as_bools(&self) -> &[bool] {
        &self.bits
    }

    /// Flat bits as 0/1 bytes, the interchange form handed to samplers.
    pub fn to_bits(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b)).collect()
    }
}
