use thiserror::Error;

/// A value the selected transformation could not handle. Recorded as a
/// field-level validation error; never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("unparseable date: {0}")]
    UnparseableDate(String),
    #[error("not a 10-digit US phone number: {0}")]
    InvalidPhone(String),
    #[error("unknown state: {0}")]
    UnknownState(String),
}
