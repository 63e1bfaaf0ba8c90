//! Error types for ledger operations.

use gridforge_core::{ContractId, NodeId, TwinId};
use thiserror::Error;

/// A result type using `LedgerError`.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while talking to the chain ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The contract does not exist on the ledger.
    #[error("contract not found: {0}")]
    ContractNotFound(ContractId),

    /// The signing account is unknown to the ledger.
    #[error("account not found for twin {0}")]
    AccountNotFound(TwinId),

    /// The node is unknown to the ledger.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The provided signature did not satisfy the ledger's requirements.
    #[error("signature rejected by ledger: {0}")]
    SignatureInsufficient(String),

    /// The ledger could not be reached or returned an unexpected failure.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    /// Returns true if this error might be resolved by retrying.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
