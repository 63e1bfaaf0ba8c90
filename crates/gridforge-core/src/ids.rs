//! Core identifier types for gridforge.
//!
//! This module provides strongly-typed identifiers for nodes, twins, and
//! contracts. Nodes and twins are numeric identities assigned by the chain;
//! contract IDs are allocated by the ledger when a contract is created.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric node identifier.
///
/// Nodes are independently operated remote hosts offering resources. A node
/// is never addressed directly: all traffic goes through its messaging twin,
/// resolved via [`TwinId`].
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a new `NodeId` from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A numeric messaging-twin identifier.
///
/// Twins are the addressable identities on the message bus. Both users and
/// nodes own a twin; the bus routes calls by twin, never by node.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TwinId(u32);

impl TwinId {
    /// Create a new `TwinId` from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TwinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TwinId({})", self.0)
    }
}

impl fmt::Display for TwinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TwinId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A ledger-assigned contract identifier.
///
/// The value zero is reserved: it means "no contract exists yet". Operations
/// that would act on a zero contract (cancel, update) must treat it as a
/// no-op success.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContractId(u64);

impl ContractId {
    /// The sentinel value meaning "no contract exists yet".
    pub const NONE: Self = Self(0);

    /// Create a new `ContractId` from its numeric value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Return the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// True if this is the "no contract" sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({})", self.0)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContractId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display() {
        let id = NodeId::new(14);
        assert_eq!(id.to_string(), "14");
        assert_eq!(format!("{id:?}"), "NodeId(14)");
    }

    #[test]
    fn contract_id_none_sentinel() {
        assert!(ContractId::NONE.is_none());
        assert!(ContractId::new(0).is_none());
        assert!(!ContractId::new(1).is_none());
    }

    #[test]
    fn ids_serialize_transparent() {
        let node = NodeId::new(7);
        assert_eq!(serde_json::to_string(&node).unwrap(), "7");

        let contract: ContractId = serde_json::from_str("99").unwrap();
        assert_eq!(contract, ContractId::new(99));
    }

    #[test]
    fn ids_order_numerically() {
        assert!(NodeId::new(2) < NodeId::new(10));
        assert!(ContractId::new(5) < ContractId::new(50));
    }
}
