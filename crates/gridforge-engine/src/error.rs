//! Error types for the reconciliation engine.
//!
//! The engine normalizes ledger and node failures into its own kinds so
//! callers can distinguish, per node, what went wrong and whether the node's
//! working state advanced to "committed" or rolled back.

use std::collections::BTreeMap;
use std::fmt;

use gridforge_core::{ContractId, NodeId};
use gridforge_ledger::LedgerError;
use gridforge_node::NodeError;
use gridforge_state::StateError;
use thiserror::Error;

/// A result type using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during reconciliation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A workload with this name already exists in the node's deployment.
    #[error("duplicate workload name {name:?} on node {node_id}")]
    DuplicateWorkloadName {
        /// The node whose deployment already holds the name.
        node_id: NodeId,
        /// The duplicate name.
        name: String,
    },

    /// The node could not be reached over the bus.
    #[error("node {node_id} unreachable: {reason}")]
    NodeUnreachable {
        /// The unreachable node.
        node_id: NodeId,
        /// The transport failure.
        reason: String,
    },

    /// The node responded but refused the deployment.
    #[error("node {node_id} rejected deployment: {reason}")]
    NodeRejected {
        /// The node that refused.
        node_id: NodeId,
        /// The node's refusal message.
        reason: String,
    },

    /// The ledger could not be reached or returned an unexpected failure.
    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// A contract the engine expected to exist is gone from the ledger.
    #[error("contract not found: {0}")]
    ContractNotFound(ContractId),

    /// The identity could not authorize the ledger mutation.
    #[error("signature insufficient: {0}")]
    SignatureInsufficient(String),

    /// The durable state store failed.
    #[error("state store error: {0}")]
    Store(#[from] StateError),

    /// Multiple per-node failures from a commit or cancel cycle.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl EngineError {
    /// Normalize a node error, attributing it to `node_id`.
    #[must_use]
    pub fn from_node(node_id: NodeId, err: NodeError) -> Self {
        match err {
            e @ (NodeError::Unreachable { .. }
            | NodeError::Timeout { .. }
            | NodeError::UnknownNode(_)
            | NodeError::ResolveFailed { .. }) => Self::NodeUnreachable {
                node_id,
                reason: e.to_string(),
            },
            e @ (NodeError::Rejected { .. } | NodeError::Decode { .. }) => Self::NodeRejected {
                node_id,
                reason: e.to_string(),
            },
        }
    }

    /// Normalize a ledger error.
    #[must_use]
    pub fn from_ledger(err: LedgerError) -> Self {
        match err {
            LedgerError::ContractNotFound(id) => Self::ContractNotFound(id),
            LedgerError::SignatureInsufficient(msg) => Self::SignatureInsufficient(msg),
            LedgerError::AccountNotFound(twin) => {
                Self::SignatureInsufficient(format!("account not found for twin {twin}"))
            }
            e @ (LedgerError::NodeNotFound(_) | LedgerError::Unavailable(_)) => {
                Self::LedgerUnavailable(e.to_string())
            }
        }
    }
}

/// Per-node failures collected during a commit or cancel cycle.
///
/// Nodes absent from the map succeeded; their working state advanced. Nodes
/// present failed and were rolled back to "not yet committed" (commit) or
/// remain tracked (cancel).
#[derive(Debug)]
pub struct AggregateError {
    /// The failure for each failed node.
    pub errors: BTreeMap<NodeId, EngineError>,
}

impl AggregateError {
    /// Wrap a per-node error map.
    #[must_use]
    pub fn new(errors: BTreeMap<NodeId, EngineError>) -> Self {
        Self { errors }
    }

    /// The nodes that failed.
    #[must_use]
    pub fn failed_nodes(&self) -> Vec<NodeId> {
        self.errors.keys().copied().collect()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} node(s) failed:", self.errors.len())?;
        for (node_id, error) in &self.errors {
            write!(f, " [node {node_id}: {error}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
