//! # Error Types
//!
//! Operational errors shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! A record that breaks a schema rule is not an error at this level: the
//! validation engine reports it as a list of violations. `CtgError` covers
//! the failures around it (unparseable primitives, IO, malformed input files).

use thiserror::Error;

/// Top-level error type for the record validator.
#[derive(Error, Debug)]
pub enum CtgError {
    /// A string could not be read as a calendar date.
    #[error("invalid date {input:?}: {reason}")]
    InvalidDate {
        /// The rejected input.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// A string could not be read as a record identifier.
    #[error("invalid record identifier {input:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
