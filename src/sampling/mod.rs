//! Sampler boundary and output decoding.
//!
//! - [`Sampler`] — external minimizer contract, with [`ExhaustiveSampler`] as a reference
//! - [`SampleRecord`] — one sampled state with energy and occurrence count
//! - [`SampleDecoder`] / [`decode_all`] — lenient decoding into a [`SampleDistribution`]
//! - [`best`] — minimum-energy tour of a distribution

mod decoder;
mod distribution;
mod record;
mod sampler;

pub use decoder::{decode_all, SampleDecoder};
pub use distribution::{best, DistributionEntry, SampleDistribution};
pub use record::SampleRecord;
pub use sampler::{AnnealerSettings, ExhaustiveSampler, Sampler};
