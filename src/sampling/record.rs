//! Raw sampler output.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One distinct state reported by a sampler.
///
/// # Examples
///
/// ```
/// use u_qtsp::sampling::SampleRecord;
///
/// let r = SampleRecord::new(vec![0, 1, 1, 0], -3.0, 5).unwrap();
/// assert_eq!(r.occurrences(), 5);
/// assert!(SampleRecord::new(vec![0, 1], -1.0, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct SampleRecord {
    bits: Vec<u8>,
    energy: f64,
    occurrences: u64,
}

#[derive(Deserialize)]
struct RawRecord {
    bits: Vec<u8>,
    energy: f64,
    occurrences: u64,
}

impl TryFrom<RawRecord> for SampleRecord {
    type Error = Error;

    fn try_from(raw: RawRecord) -> Result<Self> {
        Self::new(raw.bits, raw.energy, raw.occurrences)
    }
}

impl SampleRecord {
    /// Fails if `occurrences` is 0, `energy` is not finite, or a bit is not 0 or 1.
    pub fn new(bits: Vec<u8>, energy: f64, occurrences: u64) -> Result<Self> {
        if occurrences == 0 {
            return Err(Error::invalid_argument("sample occurrence count must be at least 1"));
        }
        if !energy.is_finite() {
            return Err(Error::invalid_argument(format!(
                "sample energy must be finite, got {energy}"
            )));
        }
        if let Some(k) = bits.iter().position(|&b| b > 1) {
            return Err(Error::invalid_argument(format!(
                "sample bit {k} has value {}, expected 0 or 1",
                bits[k]
            )));
        }
        Ok(Self {
            bits,
            energy,
            occurrences,
        })
    }

    /// The sampled state, one 0/1 entry per variable.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Objective value the sampler reported for this state.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// How many times the sampler returned this state.
    pub fn occurrences(&self) -> u64 {
        self.occurrences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let r = SampleRecord::new(vec![1, 0, 0, 1], -2.5, 3).expect("valid");
        assert_eq!(r.bits(), &[1, 0, 0, 1]);
        assert_eq!(r.energy(), -2.5);
        assert_eq!(r.occurrences(), 3);
    }

    #[test]
    fn test_rejects_non_finite_energy() {
        assert!(SampleRecord::new(vec![0, 1, 1, 0], f64::NAN, 1).is_err());
        assert!(SampleRecord::new(vec![0, 1, 1, 0], f64::NEG_INFINITY, 1).is_err());
    }

    #[test]
    fn test_rejects_non_binary() {
        assert!(SampleRecord::new(vec![0, 3], 0.0, 1).is_err());
    }

    #[test]
    fn test_deserialize() {
        let r: SampleRecord =
            serde_json::from_str(r#"{"bits":[1,0,0,1],"energy":-1.0,"occurrences":2}"#)
                .expect("valid json");
        assert_eq!(r.occurrences(), 2);
        assert!(serde_json::from_str::<SampleRecord>(
            r#"{"bits":[1,0,0,1],"energy":-1.0,"occurrences":0}"#
        )
        .is_err());
    }
}
