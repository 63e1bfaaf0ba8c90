//! Error types for node communication.

use gridforge_core::{NodeId, TwinId};
use thiserror::Error;

/// A result type using `NodeError`.
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors that can occur while talking to a node over the bus.
///
/// The engine's retry policy differs between a node that could not be
/// reached and a node that answered but refused, so the two are distinct
/// variants.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The node's twin could not be reached over the bus.
    #[error("twin {twin} unreachable: {reason}")]
    Unreachable {
        /// The twin that was addressed.
        twin: TwinId,
        /// Transport-level failure description.
        reason: String,
    },

    /// The call timed out waiting for the node.
    #[error("call to twin {twin} timed out after {timeout_ms}ms ({command})")]
    Timeout {
        /// The twin that was addressed.
        twin: TwinId,
        /// The command that timed out.
        command: String,
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The node responded but refused the request.
    #[error("twin {twin} rejected {command}: {reason}")]
    Rejected {
        /// The twin that answered.
        twin: TwinId,
        /// The command that was refused.
        command: String,
        /// The node's refusal message.
        reason: String,
    },

    /// The node's response could not be decoded.
    #[error("bad response to {command}: {reason}")]
    Decode {
        /// The command whose response was malformed.
        command: String,
        /// What went wrong while decoding.
        reason: String,
    },

    /// The node could not be resolved to a twin.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// Twin resolution failed for a reason other than the node being
    /// unknown (e.g. the ledger lookup itself failed).
    #[error("failed to resolve twin for node {node_id}: {reason}")]
    ResolveFailed {
        /// The node being resolved.
        node_id: NodeId,
        /// The underlying lookup failure.
        reason: String,
    },
}

impl NodeError {
    /// True if the node never answered (timeouts count as unreachable).
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Timeout { .. })
    }
}
