//! The persisted state snapshot.

use std::collections::BTreeMap;

use gridforge_core::{ContractId, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The engine's durable state: node → contract mapping plus opaque user
/// data.
///
/// The user-data blob is carried verbatim for the caller; the engine never
/// interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Last-committed contract per node.
    #[serde(default)]
    pub contracts: BTreeMap<NodeId, ContractId>,
    /// Opaque caller-owned data (e.g. generated network secrets).
    #[serde(default)]
    pub user_data: Value,
}

impl StateSnapshot {
    /// Create a snapshot from its parts.
    #[must_use]
    pub const fn new(contracts: BTreeMap<NodeId, ContractId>, user_data: Value) -> Self {
        Self {
            contracts,
            user_data,
        }
    }

    /// True if no contracts are tracked and no user data is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty() && self.user_data.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_empty() {
        assert!(StateSnapshot::default().is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let mut contracts = BTreeMap::new();
        contracts.insert(NodeId::new(14), ContractId::new(7));
        contracts.insert(NodeId::new(21), ContractId::new(9));
        let snapshot = StateSnapshot::new(contracts, json!({"wg_secret": "abc"}));

        let encoded = serde_json::to_string(&snapshot).unwrap();
        let decoded: StateSnapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn missing_fields_default() {
        let decoded: StateSnapshot = serde_json::from_str("{}").unwrap();
        assert!(decoded.is_empty());
    }
}
