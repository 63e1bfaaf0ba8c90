//! Error types for the domain model.

use thiserror::Error;

/// A result type using `ModelError`.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while building or parsing domain types.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A workload with this name already exists in the deployment.
    #[error("duplicate workload name: {0}")]
    DuplicateWorkloadName(String),

    /// A hash string was not valid hex.
    #[error("invalid hex in hash")]
    InvalidHex,

    /// A hash had the wrong byte length.
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// The expected byte length.
        expected: usize,
        /// The actual byte length.
        got: usize,
    },
}
