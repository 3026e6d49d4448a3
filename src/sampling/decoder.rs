//! Sample decoding and aggregation.

use crate::distance::DistanceMatrix;
use crate::encoding::{decode, square_side, DecodeMode, OneHotAssignment, ReductionContext};
use crate::error::{Error, Result};
use crate::exact::tour_cost;
use crate::models::is_permutation;

use super::{SampleDistribution, SampleRecord};

/// Turns sampler records into a [`SampleDistribution`].
///
/// Records are decoded leniently: sampler output is not guaranteed to be a
/// permutation matrix, and every record still yields an order of full length.
/// With a [`ReductionContext`] the reduced order is expanded back to the
/// original node numbering with the start node first.
///
/// # Examples
///
/// ```
/// use u_qtsp::encoding::ReductionContext;
/// use u_qtsp::sampling::{SampleDecoder, SampleRecord};
///
/// let ctx = ReductionContext::new(0, 3).unwrap();
/// let records = vec![
///     SampleRecord::new(vec![0, 1, 1, 0], -3.0, 5).unwrap(),
///     SampleRecord::new(vec![0, 1, 1, 1], -3.0, 7).unwrap(),
/// ];
/// let dist = SampleDecoder::new().with_reduction(ctx).decode_all(&records).unwrap();
/// let e = dist.get(&[0, 2, 1]).unwrap();
/// assert_eq!((e.energy, e.occurrences), (-3.0, 12));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SampleDecoder {
    reduction: Option<ReductionContext>,
    canonical_start: Option<usize>,
    distances: Option<DistanceMatrix>,
}

impl SampleDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat records as reduced-form assignments for this fixed start.
    pub fn with_reduction(mut self, ctx: ReductionContext) -> Self {
        self.reduction = Some(ctx);
        self
    }

    /// Rotate valid full-form tours to begin at `node` before aggregating.
    ///
    /// Ignored when a reduction is set; reduced tours already begin at the
    /// start node.
    pub fn with_canonical_start(mut self, node: usize) -> Self {
        self.canonical_start = Some(node);
        self
    }

    /// Score each decoded tour with these (un-normalized) distances.
    pub fn with_distances(mut self, distances: DistanceMatrix) -> Self {
        self.distances = Some(distances);
        self
    }

    /// Decodes and aggregates every record.
    ///
    /// Fails if a record's length is not a perfect square, or does not match
    /// the reduction context or distance matrix. Errors carry the index of
    /// the offending record as [`Error::InRecord`].
    pub fn decode_all(&self, records: &[SampleRecord]) -> Result<SampleDistribution> {
        let mut distribution = SampleDistribution::new();
        let mut repaired = 0u64;
        let mut invalid = 0u64;

        for (k, record) in records.iter().enumerate() {
            let (tour, was_repaired) = self
                .decode_record(record)
                .map_err(|e| Error::in_record(k, e))?;
            if was_repaired {
                repaired += record.occurrences();
            }
            if !is_permutation(&tour) {
                invalid += record.occurrences();
            }
            let cost = self.distances.as_ref().map(|d| tour_cost(d, &tour));
            distribution.record(tour, record.energy(), record.occurrences(), was_repaired, cost);
        }

        log::debug!(
            "decoded {} records into {} tours ({} occurrences repaired)",
            records.len(),
            distribution.len(),
            repaired
        );
        if invalid > 0 {
            log::warn!(
                "{invalid} of {} sampled occurrences decoded to degenerate tours",
                distribution.total_occurrences()
            );
        }
        Ok(distribution)
    }

    fn decode_record(&self, record: &SampleRecord) -> Result<(Vec<usize>, bool)> {
        let side = square_side(record.bits().len()).ok_or_else(|| {
            Error::invalid_argument(format!(
                "bit vector length {} is not a perfect square",
                record.bits().len()
            ))
        })?;
        let n = match &self.reduction {
            Some(ctx) => ctx.node_count(),
            None => side,
        };
        if let Some(d) = &self.distances {
            if d.size() != n {
                return Err(Error::size_mismatch("distance matrix size", n, d.size()));
            }
        }

        let assignment = OneHotAssignment::from_bits(record.bits())?;
        let decoded = decode(&assignment, DecodeMode::Lenient)?;
        let tour = match (&self.reduction, self.canonical_start) {
            (Some(ctx), _) => ctx.expand(&decoded.order)?,
            (None, Some(node)) if !decoded.degenerate => rotate_to(decoded.order, node),
            (None, _) => decoded.order,
        };
        Ok((tour, decoded.degenerate))
    }
}

fn rotate_to(mut order: Vec<usize>, node: usize) -> Vec<usize> {
    if let Some(pos) = order.iter().position(|&v| v == node) {
        order.rotate_left(pos);
    }
    order
}

/// Decodes `records` leniently, expanding through `reduction` when given.
pub fn decode_all(
    records: &[SampleRecord],
    reduction: Option<&ReductionContext>,
) -> Result<SampleDistribution> {
    let decoder = match reduction {
        Some(ctx) => SampleDecoder::new().with_reduction(*ctx),
        None => SampleDecoder::new(),
    };
    decoder.decode_all(records)
}
