//! Structured error types for the Nacre crates.

use thiserror::Error;

/// Unified error type for all Nacre operations.
#[derive(Debug, Error)]
pub enum NacreError {
    /// Parse error (sequence data that does not fit its alphabet)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias used throughout the Nacre crates.
pub type Result<T> = std::result::Result<T, NacreError>;
