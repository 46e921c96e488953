//! Error types for order key and WBS code generation.

use thiserror::Error;

/// Errors returned while parsing or generating order keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderKeyError {
    /// The value is not a well-formed order key.
    #[error("invalid order key '{0}'")]
    InvalidKey(String),

    /// The lower bound does not sort strictly before the upper bound.
    #[error("order key range is empty: '{lower}' is not below '{upper}'")]
    InvalidRange {
        /// Requested lower bound.
        lower: String,
        /// Requested upper bound.
        upper: String,
    },

    /// No key exists in the requested direction.
    #[error("order key space exhausted")]
    Exhausted,
}

/// Errors returned while parsing or generating WBS codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WbsError {
    /// The value is not a dot-separated list of non-negative integers.
    #[error("malformed WBS code '{0}'")]
    Malformed(String),

    /// The previous code does not sort strictly before the next code.
    #[error("WBS range is empty: '{lower}' is not below '{upper}'")]
    InvalidRange {
        /// Requested lower bound.
        lower: String,
        /// Requested upper bound.
        upper: String,
    },

    /// No code fits below the given upper bound.
    #[error("no WBS code fits below '{0}'")]
    NoRoom(String),
}
