//! Error types for hypervault-core.

use alloy_primitives::Address;
use thiserror::Error;

/// Core error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Caller {caller} is not the vault owner")]
    Unauthorized { caller: Address },

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(String),

    #[error("Scaled value overflows u64: {0}")]
    ScaleOverflow(String),

    #[error("Unsupported decimal precision: {0}")]
    UnsupportedDecimals(u8),

    #[error("Scale mismatch for {context}: expected {expected} decimals, got {actual}")]
    ScaleMismatch {
        context: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("Unknown time-in-force code: {0}")]
    InvalidTimeInForce(u8),

    #[error("Unknown token symbol: {0}")]
    UnknownSymbol(String),

    #[error("Submission rejected by Core sink: {0}")]
    SubmissionRejected(String),
}

/// Result type alias for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
