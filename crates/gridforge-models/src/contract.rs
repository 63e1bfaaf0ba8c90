//! Contracts: ledger-anchored resource leases.
//!
//! A contract binds a requester twin, a node, and a deployment hash to a
//! `ContractId`. The body hash recorded here must match the hash of the
//! deployment currently live on the node; a mismatch means ledger and remote
//! state have diverged and must be reconciled with an update, never a blind
//! create.

use chrono::{DateTime, Utc};
use gridforge_core::{ContractId, NodeId, TwinId};
use serde::{Deserialize, Serialize};

use crate::deployment::DeploymentHash;

/// Lifecycle states for a contract on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    /// Active and billed.
    Created,
    /// Billing failed; the contract survives a grace window before deletion.
    GracePeriod,
    /// Terminal: the contract is gone.
    Deleted,
}

/// What a contract leases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ContractKind {
    /// A resource lease on a node, sized by its deployment.
    Node {
        /// The node the resources live on.
        node_id: NodeId,
        /// Content hash of the deployment this contract backs.
        deployment_hash: DeploymentHash,
        /// Number of public IPs reserved.
        public_ips: u32,
    },
    /// A globally-unique name reservation.
    Name {
        /// The reserved name.
        name: String,
    },
}

/// A contract record as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Ledger-assigned identifier.
    pub id: ContractId,
    /// The twin that owns (and pays for) the contract.
    pub twin_id: TwinId,
    /// Current lifecycle state.
    pub state: ContractState,
    /// What is leased.
    pub kind: ContractKind,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Contract {
    /// True if the contract is in the `Created` state.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.state == ContractState::Created
    }

    /// The recorded deployment hash, for node contracts.
    #[must_use]
    pub fn deployment_hash(&self) -> Option<&DeploymentHash> {
        match &self.kind {
            ContractKind::Node {
                deployment_hash, ..
            } => Some(deployment_hash),
            ContractKind::Name { .. } => None,
        }
    }

    /// The reserved name, for name contracts.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ContractKind::Name { name } => Some(name),
            ContractKind::Node { .. } => None,
        }
    }

    /// The node the contract leases resources on, for node contracts.
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        match &self.kind {
            ContractKind::Node { node_id, .. } => Some(*node_id),
            ContractKind::Name { .. } => None,
        }
    }

    /// The number of reserved public IPs, for node contracts.
    #[must_use]
    pub fn public_ips(&self) -> u32 {
        match &self.kind {
            ContractKind::Node { public_ips, .. } => *public_ips,
            ContractKind::Name { .. } => 0,
        }
    }
}
