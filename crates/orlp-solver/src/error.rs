use thiserror::Error;

/// Malformed model input, caught before anything reaches the solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid relation: {0:?} (expected one of <=, >=, =)")]
    InvalidRelation(String),
    #[error("Invalid bounds for activity {activity}: lower {lower} exceeds upper {upper}")]
    InvalidBound {
        activity: String,
        lower: f64,
        upper: f64,
    },
    #[error("Non-finite value in {what} at index {index}")]
    NonFinite { what: String, index: usize },
    #[error("Integer bound {bound} of activity {activity} is outside the 32-bit integer range")]
    IntegerRange { activity: String, bound: f64 },
    #[error("Index {index} out of range for {what} (length {len})")]
    IndexOutOfRange {
        what: String,
        index: usize,
        len: usize,
    },
}

impl ModelError {
    pub(crate) fn mismatch(what: impl Into<String>, expected: usize, found: usize) -> Self {
        ModelError::DimensionMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}

/// Failure inside the external solving capability, passed through verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("Solver error: {0}")]
pub struct SolverError(pub String);
