//! Aggregated sample distribution keyed by tour.

use std::collections::HashMap;

use crate::models::is_permutation;

/// Aggregate of every record that decoded to one tour.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionEntry {
    /// Decoded visiting order (may be degenerate).
    pub tour: Vec<usize>,
    /// Lowest energy among the merged records.
    pub energy: f64,
    /// Sum of occurrence counts of the merged records.
    pub occurrences: u64,
    /// Occurrences whose assignment needed repair during lenient decoding.
    pub repaired: u64,
    /// Travel cost of `tour`, when the decoder was given distances.
    pub cost: Option<f64>,
}

impl DistributionEntry {
    /// `true` if `tour` visits every node exactly once.
    pub fn is_valid(&self) -> bool {
        is_permutation(&self.tour)
    }
}

/// Tours in first-seen order, with merged energy and counts.
///
/// Merging keeps the minimum energy and sums occurrence counts. A NaN
/// energy ranks above every number, so it never displaces a real one.
///
/// # Examples
///
/// ```
/// use u_qtsp::sampling::SampleDistribution;
///
/// let mut d = SampleDistribution::new();
/// d.record(vec![0, 1, 2], -3.0, 5, false, None);
/// d.record(vec![0, 1, 2], -3.0, 7, true, None);
/// let e = d.get(&[0, 1, 2]).unwrap();
/// assert_eq!((e.energy, e.occurrences, e.repaired), (-3.0, 12, 7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SampleDistribution {
    entries: Vec<DistributionEntry>,
    index: HashMap<Vec<usize>, usize>,
}

impl SampleDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one decoded record into the distribution.
    pub fn record(
        &mut self,
        tour: Vec<usize>,
        energy: f64,
        occurrences: u64,
        repaired: bool,
        cost: Option<f64>,
    ) {
        let repaired = if repaired { occurrences } else { 0 };
        match self.index.get(&tour) {
            Some(&k) => {
                let entry = &mut self.entries[k];
                if energy_lt(energy, entry.energy) {
                    entry.energy = energy;
                }
                entry.occurrences += occurrences;
                entry.repaired += repaired;
            }
            None => {
                self.index.insert(tour.clone(), self.entries.len());
                self.entries.push(DistributionEntry {
                    tour,
                    energy,
                    occurrences,
                    repaired,
                    cost,
                });
            }
        }
    }

    pub fn get(&self, tour: &[usize]) -> Option<&DistributionEntry> {
        self.index.get(tour).map(|&k| &self.entries[k])
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &DistributionEntry> {
        self.entries.iter()
    }

    /// Number of distinct tours.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_occurrences(&self) -> u64 {
        self.entries.iter().map(|e| e.occurrences).sum()
    }

    /// Share of occurrences that decoded to a valid tour (0 when empty).
    pub fn valid_fraction(&self) -> f64 {
        let total = self.total_occurrences();
        if total == 0 {
            return 0.0;
        }
        let valid: u64 = self
            .entries
            .iter()
            .filter(|e| e.is_valid())
            .map(|e| e.occurrences)
            .sum();
        valid as f64 / total as f64
    }

    /// Minimum-energy entry; ties go to the first seen.
    pub fn best(&self) -> Option<&DistributionEntry> {
        Self::min_energy(self.entries.iter())
    }

    /// Minimum-energy entry among valid tours; ties go to the first seen.
    pub fn best_valid(&self) -> Option<&DistributionEntry> {
        Self::min_energy(self.entries.iter().filter(|e| e.is_valid()))
    }

    fn min_energy<'a>(
        entries: impl Iterator<Item = &'a DistributionEntry>,
    ) -> Option<&'a DistributionEntry> {
        entries.fold(None::<&'a DistributionEntry>, |best, e| match best {
            Some(b) if !energy_lt(e.energy, b.energy) => Some(b),
            _ => Some(e),
        })
    }
}

/// `a < b`, with NaN above every number.
fn energy_lt(a: f64, b: f64) -> bool {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a < b,
        (false, true) => true,
        (true, _) => false,
    }
}

/// Tour with the minimum energy in `distribution`, first seen on ties.
pub fn best(distribution: &SampleDistribution) -> Option<&[usize]> {
    distribution.best().map(|e| e.tour.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_min_energy_and_sums_counts() {
        let mut d = SampleDistribution::new();
        d.record(vec![0, 2, 1], -1.0, 2, false, Some(3.0));
        d.record(vec![0, 2, 1], -4.0, 3, false, Some(3.0));
        d.record(vec![0, 2, 1], -2.0, 1, false, Some(3.0));
        let e = d.get(&[0, 2, 1]).expect("present");
        assert_eq!(e.energy, -4.0);
        assert_eq!(e.occurrences, 6);
        assert_eq!(e.repaired, 0);
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_best_first_seen_on_tie() {
        let mut d = SampleDistribution::new();
        d.record(vec![0, 1, 2], -5.0, 1, false, None);
        d.record(vec![0, 2, 1], -5.0, 9, false, None);
        d.record(vec![1, 1, 2], -2.0, 1, true, None);
        assert_eq!(best(&d), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn test_best_valid_skips_degenerate() {
        let mut d = SampleDistribution::new();
        d.record(vec![0, 0, 2], -9.0, 4, true, None);
        d.record(vec![0, 2, 1], -5.0, 1, false, None);
        assert_eq!(d.best().expect("non-empty").tour, vec![0, 0, 2]);
        assert_eq!(d.best_valid().expect("has valid").tour, vec![0, 2, 1]);
        assert!((d.valid_fraction() - 0.2).abs() < 1e-12);
        assert_eq!(d.total_occurrences(), 5);
    }

    #[test]
    fn test_nan_energy_never_wins() {
        let mut d = SampleDistribution::new();
        d.record(vec![0, 1], -5.0, 1, false, None);
        d.record(vec![1, 0], f64::NAN, 1, false, None);
        assert_eq!(best(&d), Some(&[0, 1][..]));

        let mut d = SampleDistribution::new();
        d.record(vec![1, 0], f64::NAN, 1, false, None);
        d.record(vec![0, 1], -5.0, 1, false, None);
        assert_eq!(best(&d), Some(&[0, 1][..]));
    }

    #[test]
    fn test_merge_replaces_nan_energy() {
        let mut d = SampleDistribution::new();
        d.record(vec![0, 1], f64::NAN, 1, false, None);
        d.record(vec![0, 1], -2.0, 1, false, None);
        d.record(vec![0, 1], f64::NAN, 1, false, None);
        let e = d.get(&[0, 1]).expect("present");
        assert_eq!((e.energy, e.occurrences), (-2.0, 3));
    }

    #[test]
    fn test_empty() {
        let d = SampleDistribution::new();
        assert!(d.is_empty());
        assert!(best(&d).is_none());
        assert_eq!(d.valid_fraction(), 0.0);
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut d = SampleDistribution::new();
        d.record(vec![0, 2, 1], 1.0, 1, false, None);
        d.record(vec![0, 1, 2], 0.0, 1, false, None);
        let tours: Vec<_> = d.iter().map(|e| e.tour.clone()).collect();
        assert_eq!(tours, vec![vec![0, 2, 1], vec![0, 1, 2]]);
    }
}
