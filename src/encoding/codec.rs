//! Tour ⇄ one-hot conversion.
//!
//! # Layout
//!
//! A visiting order of `m` nodes becomes an `m × m` permutation matrix with
//! row = time slot and column = node:
//!
//! ```text
//! bit[t * m + order[t]] = 1
//! ```
//!
//! A full tour with a known start is encoded in reduced form: the start
//! node and slot 0 are dropped, so a tour of `n` nodes occupies `(n - 1)²`
//! bits. For start node 0 this is `bit[(n-1)*(j-1) + (tour[j]-1)] = 1` for
//! `j ≥ 1`.
//!
//! # Decoding
//!
//! Samplers may return assignments that are not permutation matrices.
//! [`DecodeMode::Strict`] rejects those with
//! [`Error::InvalidAssignment`]; [`DecodeMode::Lenient`] always yields an
//! order of length `m`, taking the lowest active column per row and filling
//! empty rows with the lowest node no row selected, and marks the result
//! degenerate.

use crate::error::{AssignmentViolation, Error, Result};
use crate::exact::Permutations;
use crate::models::{is_permutation, Tour};

use super::{OneHotAssignment, ReductionContext};

/// How [`decode`] treats assignments that are not permutation matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Fail on the first row or column that breaks the permutation rule.
    #[default]
    Strict,
    /// Never fail; repair and flag the result instead.
    Lenient,
}

/// Result of decoding an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedOrder {
    /// One node per time slot; always `side` entries long.
    pub order: Vec<usize>,
    /// `true` if the assignment was not a permutation matrix. The order may
    /// then contain duplicate or missing nodes, or have had rows repaired.
    pub degenerate: bool,
}

impl DecodedOrder {
    /// Converts a non-degenerate order into a validated [`Tour`].
    pub fn into_tour(self) -> Result<Tour> {
        if self.degenerate {
            return Err(Error::invalid_argument(format!(
                "decoded order {:?} is degenerate",
                self.order
            )));
        }
        Tour::new(self.order)
    }
}

/// Encodes a permutation of `0..m` as an `m × m` one-hot assignment.
///
/// # Examples
///
/// ```
/// use u_qtsp::encoding::encode_order;
///
/// let a = encode_order(&[1, 0]).unwrap();
/// assert_eq!(a.to_bits(), vec![0, 1, 1, 0]);
/// ```
pub fn encode_order(order: &[usize]) -> Result<OneHotAssignment> {
    if !is_permutation(order) {
        return Err(Error::invalid_argument(format!(
            "{order:?} is not a permutation of 0..{}",
            order.len()
        )));
    }
    let mut assignment = OneHotAssignment::zeros(order.len());
    for (t, &node) in order.iter().enumerate() {
        assignment.set(t, node, true);
    }
    Ok(assignment)
}

/// Encodes a tour in reduced form, fixing `tour.start()` as the start node.
///
/// # Examples
///
/// ```
/// use u_qtsp::encoding::encode;
/// use u_qtsp::models::Tour;
///
/// let tour = Tour::new(vec![0, 2, 1]).unwrap();
/// // slot 1 → node 2, slot 2 → node 1
/// assert_eq!(encode(&tour).unwrap().to_bits(), vec![0, 1, 1, 0]);
/// ```
pub fn encode(tour: &Tour) -> Result<OneHotAssignment> {
    let ctx = ReductionContext::new(tour.start(), tour.len())?;
    encode_order(&ctx.reduce(tour)?)
}

/// Decodes an assignment into one node per time slot.
///
/// # Examples
///
/// ```
/// use u_qtsp::encoding::{decode, DecodeMode, OneHotAssignment};
///
/// let crowded = OneHotAssignment::from_bits(&[1, 1, 0, 0]).unwrap();
/// assert!(decode(&crowded, DecodeMode::Strict).is_err());
///
/// let lenient = decode(&crowded, DecodeMode::Lenient).unwrap();
/// assert_eq!(lenient.order, vec![0, 1]);
/// assert!(lenient.degenerate);
/// ```
pub fn decode(assignment: &OneHotAssignment, mode: DecodeMode) -> Result<DecodedOrder> {
    let m = assignment.side();
    let mut picks: Vec<Option<usize>> = Vec::with_capacity(m);
    let mut first_row_of = vec![None; m];
    let mut degenerate = false;

    for t in 0..m {
        let row = assignment.row(t);
        let active = row.iter().filter(|&&b| b).count();
        let first = row.iter().position(|&b| b);

        let violation = match first {
            None => Some(AssignmentViolation::EmptyRow),
            Some(_) if active > 1 => Some(AssignmentViolation::CrowdedRow { active }),
            Some(node) => first_row_of[node].map(|first_row| AssignmentViolation::RepeatedColumn {
                column: node,
                first_row,
            }),
        };
        if let Some(kind) = violation {
            if mode == DecodeMode::Strict {
                return Err(Error::InvalidAssignment { row: t, kind });
            }
            degenerate = true;
        }
        if let Some(node) = first {
            first_row_of[node].get_or_insert(t);
        }
        picks.push(first);
    }

    let mut unused = (0..m).filter(|&node| first_row_of[node].is_none());
    let order: Vec<usize> = picks
        .into_iter()
        .map(|pick| pick.unwrap_or_else(|| unused.next().unwrap_or(0)))
        .collect();

    debug_assert!(degenerate || is_permutation(&order));
    Ok(DecodedOrder { order, degenerate })
}

/// Decodes a reduced-form assignment back into a full order starting at `start`.
///
/// Inverse of [`encode`] for valid tours. With [`DecodeMode::Lenient`] the
/// returned order always has `side + 1` entries.
pub fn decode_tour(
    assignment: &OneHotAssignment,
    start: usize,
    mode: DecodeMode,
) -> Result<DecodedOrder> {
    let ctx = ReductionContext::new(start, assignment.side() + 1)?;
    let decoded = decode(assignment, mode)?;
    Ok(DecodedOrder {
        order: ctx.expand(&decoded.order)?,
        degenerate: decoded.degenerate,
    })
}

/// Every valid `m × m` assignment, in lexicographic order of the permutation
/// it encodes.
///
/// # Examples
///
/// ```
/// use u_qtsp::encoding::feasible_assignments;
///
/// let all: Vec<_> = feasible_assignments(3).collect();
/// assert_eq!(all.len(), 6);
/// assert!(all.iter().all(|a| a.is_permutation_matrix()));
/// ```
pub fn feasible_assignments(m: usize) -> impl Iterator<Item = OneHotAssignment> {
    Permutations::new((0..m).collect()).map(|order| {
        let mut assignment = OneHotAssignment::zeros(order.len());
        for (t, &node) in order.iter().enumerate() {
            assignment.set(t, node, true);
        }
        assignment
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bits(v: &[u8]) -> OneHotAssignment {
        OneHotAssignment::from_bits(v).expect("square")
    }

    #[test]
    fn test_encode_reduced_layout() {
        // 0 → 3 → 1 → 2: slot 1 holds node 3, slot 2 node 1, slot 3 node 2
        let tour = Tour::new(vec![0, 3, 1, 2]).expect("valid");
        let a = encode(&tour).expect("valid");
        assert_eq!(a.side(), 3);
        assert_eq!(a.to_bits(), vec![0, 0, 1, 1, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_encode_nonzero_start() {
        let tour = Tour::new(vec![2, 0, 1]).expect("valid");
        let a = encode(&tour).expect("valid");
        assert_eq!(a.to_bits(), vec![1, 0, 0, 1]);
        let back = decode_tour(&a, 2, DecodeMode::Strict).expect("valid");
        assert_eq!(back.order, vec![2, 0, 1]);
    }

    #[test]
    fn test_encode_single_node() {
        let tour = Tour::new(vec![0]).expect("valid");
        let a = encode(&tour).expect("valid");
        assert!(a.is_empty());
        let back = decode_tour(&a, 0, DecodeMode::Strict).expect("valid");
        assert_eq!(back.order, vec![0]);
    }

    #[test]
    fn test_encode_order_rejects_non_permutation() {
        assert!(encode_order(&[0, 0]).is_err());
        assert!(encode_order(&[1, 2]).is_err());
    }

    #[test]
    fn test_strict_empty_row() {
        let err = decode(&bits(&[1, 0, 0, 0]), DecodeMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAssignment {
                row: 1,
                kind: AssignmentViolation::EmptyRow
            }
        ));
    }

    #[test]
    fn test_strict_crowded_row() {
        let err = decode(&bits(&[0, 0, 1, 1, 1, 0, 0, 1, 0]), DecodeMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAssignment {
                row: 1,
                kind: AssignmentViolation::CrowdedRow { active: 2 }
            }
        ));
    }

    #[test]
    fn test_strict_repeated_column() {
        let err = decode(&bits(&[0, 1, 0, 1]), DecodeMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAssignment {
                row: 1,
                kind: AssignmentViolation::RepeatedColumn {
                    column: 1,
                    first_row: 0
                }
            }
        ));
    }

    #[test]
    fn test_lenient_fills_empty_rows() {
        // row 0 empty, row 1 → node 0, row 2 empty
        let d = decode(&bits(&[0, 0, 0, 1, 0, 0, 0, 0, 0]), DecodeMode::Lenient).expect("lenient");
        assert_eq!(d.order, vec![1, 0, 2]);
        assert!(d.degenerate);
    }

    #[test]
    fn test_lenient_keeps_duplicates() {
        let d = decode(&bits(&[0, 1, 0, 1]), DecodeMode::Lenient).expect("lenient");
        assert_eq!(d.order, vec![1, 1]);
        assert!(d.degenerate);
        assert!(d.into_tour().is_err());
    }

    #[test]
    fn test_lenient_all_zero_has_full_length() {
        let d = decode(&OneHotAssignment::zeros(4), DecodeMode::Lenient).expect("lenient");
        assert_eq!(d.order, vec![0, 1, 2, 3]);
        assert!(d.degenerate);
    }

    #[test]
    fn test_lenient_valid_is_clean() {
        let d = decode(&bits(&[0, 1, 1, 0]), DecodeMode::Lenient).expect("lenient");
        assert_eq!(d.order, vec![1, 0]);
        assert!(!d.degenerate);
        assert_eq!(d.into_tour().expect("valid").order(), &[1, 0]);
    }

    #[test]
    fn test_feasible_assignments_lexicographic() {
        let all: Vec<Vec<u8>> = feasible_assignments(2).map(|a| a.to_bits()).collect();
        assert_eq!(all, vec![vec![1, 0, 0, 1], vec![0, 1, 1, 0]]);
    }

    fn start_fixed_tour() -> impl Strategy<Value = Tour> {
        (1usize..8)
            .prop_flat_map(|n| Just((1..n).collect::<Vec<_>>()).prop_shuffle())
            .prop_map(|rest| {
                let mut order = vec![0];
                order.extend(rest);
                Tour::new(order).expect("permutation")
            })
    }

    proptest! {
        #[test]
        fn prop_encode_decode_inverse(tour in start_fixed_tour()) {
            let a = encode(&tour).expect("valid");
            prop_assert!(a.is_permutation_matrix());
            let back = decode_tour(&a, 0, DecodeMode::Strict).expect("valid");
            prop_assert!(!back.degenerate);
            prop_assert_eq!(back.order, tour.order().to_vec());
        }

        #[test]
        fn prop_lenient_flag_matches_strict(raw in proptest::collection::vec(0u8..2, 16)) {
            let a = bits(&raw);
            let lenient = decode(&a, DecodeMode::Lenient).expect("never fails");
            prop_assert_eq!(lenient.order.len(), 4);
            prop_assert_eq!(lenient.degenerate, decode(&a, DecodeMode::Strict).is_err());
        }
    }
}
