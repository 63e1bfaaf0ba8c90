//! Error types for the state store.

use thiserror::Error;

/// A result type using `StateError`.
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur during state store operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// A filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored snapshot could not be parsed.
    #[error("corrupt state file: {0}")]
    Corrupt(String),

    /// The snapshot could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}
