use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MqlError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
