//! Crate error type.

use thiserror::Error as ThisError;

/// Why a row or column of a one-hot assignment broke the permutation-matrix rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentViolation {
    /// A time slot has no active node.
    EmptyRow,
    /// A time slot has more than one active node.
    CrowdedRow { active: usize },
    /// A node is active in more than one time slot.
    RepeatedColumn { column: usize, first_row: usize },
}

impl std::fmt::Display for AssignmentViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRow => write!(f, "no active bit, expected exactly 1"),
            Self::CrowdedRow { active } => {
                write!(f, "{active} active bits, expected exactly 1")
            }
            Self::RepeatedColumn { column, first_row } => {
                write!(f, "column {column} already used by row {first_row}")
            }
        }
    }
}

/// Crate error.
///
/// Malformed input is reported as [`InvalidArgument`](Self::InvalidArgument),
/// or as [`SizeMismatch`](Self::SizeMismatch) when the defect is a length
/// with a known expected value. Errors raised while decoding one sample
/// arrive wrapped in [`InRecord`](Self::InRecord). Use
/// [`is_invalid_argument`](Self::is_invalid_argument) to catch all of these.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A malformed length; a kind of invalid argument.
    #[error("{what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid assignment at row {row}: {kind}")]
    InvalidAssignment {
        row: usize,
        kind: AssignmentViolation,
    },
    #[error("sampler failed: {0}")]
    Sampler(String),
    /// Decoding sample `index` of a batch failed.
    #[error("record {index}: {source}")]
    InRecord {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn size_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            what,
            expected,
            actual,
        }
    }

    pub fn sampler(message: impl Into<String>) -> Self {
        Self::Sampler(message.into())
    }

    pub fn in_record(index: usize, source: Error) -> Self {
        Self::InRecord {
            index,
            source: Box::new(source),
        }
    }

    /// `true` for malformed input: `InvalidArgument`, `SizeMismatch`, or a
    /// record-level wrapper around either.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::InvalidArgument(_) | Self::SizeMismatch { .. } => true,
            Self::InRecord { source, .. } => source.is_invalid_argument(),
            Self::InvalidAssignment { .. } | Self::Sampler(_) => false,
        }
    }
}
