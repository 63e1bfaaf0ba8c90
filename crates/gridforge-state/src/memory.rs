//! In-memory backend for tests.

use parking_lot::Mutex;

use crate::error::Result;
use crate::snapshot::StateSnapshot;
use crate::StateStore;

/// A state store that keeps the snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StateSnapshot>,
    save_count: Mutex<u32>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
            save_count: Mutex::new(0),
        }
    }

    /// How many times `save` has been called.
    #[must_use]
    pub fn save_count(&self) -> u32 {
        *self.save_count.lock()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<StateSnapshot> {
        Ok(self.inner.lock().clone())
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<()> {
        *self.inner.lock() = snapshot.clone();
        *self.save_count.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridforge_core::{ContractId, NodeId};
    use std::collections::BTreeMap;

    #[test]
    fn roundtrip_and_save_count() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let mut contracts = BTreeMap::new();
        contracts.insert(NodeId::new(1), ContractId::new(2));
        let snapshot = StateSnapshot::new(contracts, serde_json::Value::Null);

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);
        assert_eq!(store.save_count(), 1);
    }
}
