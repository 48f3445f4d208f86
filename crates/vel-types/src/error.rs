use thiserror::Error;

/// Errors produced by type constructors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("report hash must not be empty")]
    EmptyHash,

    #[error("report hash too long: {actual} bytes exceeds the {max}-byte limit")]
    OversizedHash { max: usize, actual: usize },

    #[error("window start {start} is not before end {end}")]
    EmptyWindow { start: u64, end: u64 },
}
