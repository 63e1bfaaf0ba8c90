//! Common error types for gridforge.
//!
//! This module provides shared error types that are used across multiple
//! crates.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur throughout the gridforge system.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A key or signature had the wrong length for its scheme.
    #[error("invalid {what} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// What was being parsed (e.g. "public key", "signature").
        what: &'static str,
        /// The expected byte length.
        expected: usize,
        /// The actual byte length.
        got: usize,
    },

    /// A signature failed verification.
    #[error("signature verification failed")]
    BadSignature,

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
