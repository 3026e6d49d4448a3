//! End-to-end sampler-backed solve.

use crate::distance::DistanceMatrix;
use crate::encoding::ReductionContext;
use crate::error::{Error, Result};
use crate::models::Tour;
use crate::qubo::{ObjectiveBuilder, ObjectiveConfig};
use crate::sampling::{
    AnnealerSettings, DistributionEntry, SampleDecoder, SampleDistribution, Sampler,
};

/// Outcome of one sampler-backed solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Minimum-energy entry of `distribution`.
    pub best: DistributionEntry,
    /// Every decoded tour with its energy and occurrence count.
    pub distribution: SampleDistribution,
}

impl SolveOutcome {
    /// The best tour, if it is valid.
    pub fn tour(&self) -> Result<Tour> {
        Tour::new(self.best.tour.clone())
    }
}

/// Builds the objective, hands it to a sampler, and decodes the result.
///
/// With a start node, the fixed-start formulation over `(n-1)²` variables
/// is used; otherwise the full `n²` one.
///
/// # Examples
///
/// ```
/// use u_qtsp::models::NodeSet;
/// use u_qtsp::distance::DistanceMatrix;
/// use u_qtsp::exact::{solve, tour_cost};
/// use u_qtsp::pipeline::QuboTspSolver;
/// use u_qtsp::sampling::ExhaustiveSampler;
///
/// let nodes = NodeSet::generate(4, Some(5406)).unwrap();
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let outcome = QuboTspSolver::new(ExhaustiveSampler::default())
///     .with_start_node(0)
///     .solve(&dm)
///     .unwrap();
/// let tour = outcome.tour().unwrap();
/// let exact = solve(&dm).unwrap();
/// assert!((tour_cost(&dm, tour.order()) - tour_cost(&dm, exact.order())).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct QuboTspSolver<S> {
    sampler: S,
    config: ObjectiveConfig,
    settings: AnnealerSettings,
    start_node: Option<usize>,
}

impl<S: Sampler> QuboTspSolver<S> {
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            config: ObjectiveConfig::default(),
            settings: AnnealerSettings::default(),
            start_node: None,
        }
    }

    pub fn with_config(mut self, config: ObjectiveConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_settings(mut self, settings: AnnealerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_start_node(mut self, start: usize) -> Self {
        self.start_node = Some(start);
        self
    }

    /// Runs the sampler once and returns its decoded distribution.
    pub fn solve(&self, distances: &DistanceMatrix) -> Result<SolveOutcome> {
        self.settings.validate()?;
        let builder = ObjectiveBuilder::new(self.config.clone())?;
        let decoder = SampleDecoder::new().with_distances(distances.clone());

        let (objective, decoder) = match self.start_node {
            Some(start) => {
                let ctx = ReductionContext::new(start, distances.size())?;
                (
                    builder.build_fixed_start(distances, start)?,
                    decoder.with_reduction(ctx),
                )
            }
            None => (builder.build(distances)?, decoder),
        };

        log::debug!(
            "sampling objective: {} variables, {} terms, {} reads",
            objective.num_variables(),
            objective.num_terms(),
            self.settings.num_reads
        );
        let records = self.sampler.sample(&objective, &self.settings)?;
        if let Some(bad) = records
            .iter()
            .find(|r| r.bits().len() != objective.num_variables())
        {
            return Err(Error::sampler(format!(
                "sample has {} bits, objective has {} variables",
                bad.bits().len(),
                objective.num_variables()
            )));
        }

        let distribution = decoder.decode_all(&records)?;
        let best = distribution
            .best()
            .cloned()
            .ok_or_else(|| Error::sampler("sampler returned no samples"))?;
        log::info!(
            "sampled best tour {:?} energy={:.6} cost={:?} valid_fraction={:.3}",
            best.tour,
            best.energy,
            best.cost,
            distribution.valid_fraction()
        );
        Ok(SolveOutcome { best, distribution })
    }
}
