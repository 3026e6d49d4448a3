//! Exhaustive tour enumeration.
//!
//! # Algorithm
//!
//! Visit every permutation of `0..n` in lexicographic order, score each as a
//! closed tour, and keep the first one whose cost is strictly lower than the
//! best so far. Ties therefore go to the lexicographically smallest tour.
//!
//! # Complexity
//!
//! O(n! · n). Meant as a correctness oracle for n ≤ ~10.
//!
//! With the `parallel` feature the search is split by first node and the
//! partitions are reduced by `(cost, first node)`, which selects the same
//! tour as the sequential scan.

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::models::Tour;

/// Node count above which the solver logs a warning.
const LARGE_INSTANCE: usize = 10;

/// Lexicographic permutation iterator.
///
/// Yields the input first; the input should be sorted ascending to cover
/// every permutation. An empty input yields one empty permutation.
///
/// # Examples
///
/// ```
/// use u_qtsp::exact::Permutations;
///
/// let all: Vec<_> = Permutations::new(vec![0, 1, 2]).collect();
/// assert_eq!(all[0], vec![0, 1, 2]);
/// assert_eq!(all[1], vec![0, 2, 1]);
/// assert_eq!(all.len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Permutations {
    current: Option<Vec<usize>>,
}

impl Permutations {
    pub fn new(items: Vec<usize>) -> Self {
        Self {
            current: Some(items),
        }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;
        let mut next = current.clone();
        if next_permutation(&mut next) {
            self.current = Some(next);
        }
        Some(current)
    }
}

/// Rearranges `v` into its lexicographic successor. Returns `false` when `v`
/// is already the last permutation.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Total length of a closed tour, including the edge back to `tour[0]`.
///
/// Nodes are not checked for uniqueness, so degenerate orders can be scored.
///
/// # Panics
///
/// Panics if an entry of `tour` is out of range for `distances`.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::NodeSet;
/// use u_qtsp::distance::DistanceMatrix;
/// use u_qtsp::exact::tour_cost;
///
/// let square = NodeSet::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
/// let dm = DistanceMatrix::from_nodes(&square);
/// assert!((tour_cost(&dm, &[0, 1, 2, 3]) - 4.0).abs() < 1e-10);
/// ```
pub fn tour_cost(distances: &DistanceMatrix, tour: &[usize]) -> f64 {
    let n = tour.len();
    (0..n)
        .map(|i| distances.get(tour[i], tour[(i + 1) % n]))
        .sum()
}

/// Finds a minimum-cost tour over all `n!` visiting orders.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::NodeSet;
/// use u_qtsp::distance::DistanceMatrix;
/// use u_qtsp::exact::{solve, tour_cost};
///
/// let nodes = NodeSet::from_points(&[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0)]).unwrap();
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let best = solve(&dm).unwrap();
/// assert_eq!(best.order(), &[0, 2, 1, 3]);
/// assert!((tour_cost(&dm, best.order()) - 4.0).abs() < 1e-10);
/// ```
pub fn solve(distances: &DistanceMatrix) -> Result<Tour> {
    let n = distances.size();
    warn_if_large(n);
    let (order, cost) = best_over_first_nodes(distances, 0..n);
    log::info!("exact solve: n={n} cost={cost:.6} tour={order:?}");
    Tour::new(order)
}

/// Finds a minimum-cost tour among those that begin at `start`.
///
/// Fails if `start` is out of range.
pub fn solve_from(distances: &DistanceMatrix, start: usize) -> Result<Tour> {
    let n = distances.size();
    if start >= n {
        return Err(Error::invalid_argument(format!(
            "starting node {start} out of range [0, {n})"
        )));
    }
    warn_if_large(n);
    let (order, cost) = best_with_first(distances, start);
    log::info!("exact solve from {start}: n={n} cost={cost:.6} tour={order:?}");
    Tour::new(order)
}

fn warn_if_large(n: usize) {
    if n > LARGE_INSTANCE {
        log::warn!("exact solver enumerating {n}! tours; expect a long run");
    }
}

/// Best tour among permutations starting with `first`, in lexicographic order.
fn best_with_first(distances: &DistanceMatrix, first: usize) -> (Vec<usize>, f64) {
    let rest: Vec<usize> = (0..distances.size()).filter(|&v| v != first).collect();
    let mut best_order = Vec::new();
    let mut best_cost = f64::INFINITY;
    let mut tour = Vec::with_capacity(distances.size());

    for perm in Permutations::new(rest) {
        tour.clear();
        tour.push(first);
        tour.extend_from_slice(&perm);
        let cost = tour_cost(distances, &tour);
        if cost < best_cost || best_order.is_empty() {
            best_cost = cost;
            best_order.clone_from(&tour);
        }
    }
    (best_order, best_cost)
}

#[cfg(not(feature = "parallel"))]
fn best_over_first_nodes(
    distances: &DistanceMatrix,
    firsts: std::ops::Range<usize>,
) -> (Vec<usize>, f64) {
    let mut best: Option<(Vec<usize>, f64)> = None;
    for first in firsts {
        let candidate = best_with_first(distances, first);
        if best.as_ref().map_or(true, |(_, c)| candidate.1 < *c) {
            best = Some(candidate);
        }
    }
    best.unwrap_or_default()
}

#[cfg(feature = "parallel")]
fn best_over_first_nodes(
    distances: &DistanceMatrix,
    firsts: std::ops::Range<usize>,
) -> (Vec<usize>, f64) {
    use rayon::prelude::*;

    firsts
        .into_par_iter()
        .map(|first| (first, best_with_first(distances, first)))
        .reduce_with(|a, b| {
            let (a_first, (_, a_cost)) = &a;
            let (b_first, (_, b_cost)) = &b;
            if b_cost < a_cost || (b_cost == a_cost && b_first < a_first) {
                b
            } else {
                a
            }
        })
        .map(|(_, best)| best)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeSet;
    use proptest::prelude::*;

    fn unit_square() -> DistanceMatrix {
        let nodes =
            NodeSet::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).expect("valid");
        DistanceMatrix::from_nodes(&nodes)
    }

    #[test]
    fn test_next_permutation_sequence() {
        let all: Vec<_> = Permutations::new(vec![0, 1, 2]).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_permutations_degenerate_inputs() {
        assert_eq!(Permutations::new(vec![]).count(), 1);
        assert_eq!(Permutations::new(vec![7]).collect::<Vec<_>>(), vec![vec![7]]);
        assert_eq!(Permutations::new((0..5).collect()).count(), 120);
    }

    #[test]
    fn test_tour_cost_wraps() {
        let dm = unit_square();
        assert!((tour_cost(&dm, &[0, 1, 2, 3]) - 4.0).abs() < 1e-10);
        let crossing = 2.0 + 2.0 * 2f64.sqrt();
        assert!((tour_cost(&dm, &[0, 2, 1, 3]) - crossing).abs() < 1e-10);
        assert_eq!(tour_cost(&dm, &[2]), 0.0);
        assert_eq!(tour_cost(&dm, &[]), 0.0);
    }

    #[test]
    fn test_solve_unit_square() {
        let dm = unit_square();
        let best = solve(&dm).expect("solvable");
        assert_eq!(best.order(), &[0, 1, 2, 3]);
        assert!((tour_cost(&dm, best.order()) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_solve_tie_break_is_first_in_enumeration() {
        // every tour over 3 equidistant nodes has the same cost
        let dm = DistanceMatrix::from_data(3, vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0])
            .expect("valid");
        assert_eq!(solve(&dm).expect("solvable").order(), &[0, 1, 2]);
        assert_eq!(solve_from(&dm, 2).expect("solvable").order(), &[2, 0, 1]);
    }

    #[test]
    fn test_solve_single_node() {
        let dm = DistanceMatrix::from_data(1, vec![0.0]).expect("valid");
        assert_eq!(solve(&dm).expect("solvable").order(), &[0]);
        assert_eq!(solve_from(&dm, 0).expect("solvable").order(), &[0]);
    }

    #[test]
    fn test_solve_from_start() {
        let dm = unit_square();
        let best = solve_from(&dm, 2).expect("solvable");
        assert_eq!(best.start(), 2);
        assert!((tour_cost(&dm, best.order()) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_solve_from_out_of_range() {
        let dm = unit_square();
        assert!(matches!(solve_from(&dm, 4), Err(Error::InvalidArgument(_))));
    }

    proptest! {
        #[test]
        fn prop_exact_beats_any_tour(seed in any::<u64>(), rest in Just(vec![1usize, 2, 3, 4, 5]).prop_shuffle()) {
            let nodes = NodeSet::generate(6, Some(seed)).expect("valid");
            let dm = DistanceMatrix::from_nodes(&nodes);
            let mut order = vec![0];
            order.extend(rest);
            let best = solve(&dm).expect("solvable");
            prop_assert!(tour_cost(&dm, best.order()) <= tour_cost(&dm, &order) + 1e-9);

            let anchored = solve_from(&dm, 0).expect("solvable");
            prop_assert_eq!(anchored.start(), 0);
            // every cycle has a rotation starting at 0
            prop_assert!((tour_cost(&dm, anchored.order()) - tour_cost(&dm, best.order())).abs() < 1e-9);
        }

        #[test]
        fn prop_cost_invariant_under_rotation_and_reversal(seed in any::<u64>(), shift in 0usize..5) {
            let nodes = NodeSet::generate(5, Some(seed)).expect("valid");
            let dm = DistanceMatrix::from_nodes(&nodes);
            let tour = Tour::new(vec![0, 3, 1, 4, 2]).expect("valid");
            let base = tour_cost(&dm, tour.order());
            let rotated = tour.rotated_to(tour.order()[shift]).expect("in range");
            prop_assert!((tour_cost(&dm, rotated.order()) - base).abs() < 1e-9);
            prop_assert!((tour_cost(&dm, rotated.reversed().order()) - base).abs() < 1e-9);
        }
    }
}
