//! JSON file backend with atomic replacement.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StateError};
use crate::snapshot::StateSnapshot;
use crate::StateStore;

/// A state store backed by a single JSON file.
///
/// Saves write the full snapshot to a sibling temp file and then rename it
/// over the target. Rename is atomic on POSIX filesystems, so a crash
/// mid-save leaves either the old snapshot or the new one, never a torn
/// file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store over the given file path.
    ///
    /// The file does not need to exist yet; a missing file loads as the
    /// empty snapshot.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map_or_else(
            || std::ffi::OsString::from("state.json"),
            std::borrow::ToOwned::to_owned,
        );
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<StateSnapshot> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No state file yet, starting empty");
                return Ok(StateSnapshot::default());
            }
            Err(e) => return Err(StateError::Io(e)),
        };

        serde_json::from_slice(&data).map_err(|e| StateError::Corrupt(e.to_string()))
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<()> {
        let data = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StateError::Serialization(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, &data)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            contracts = snapshot.contracts.len(),
            "Saved state snapshot"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridforge_core::{ContractId, NodeId};
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn store() -> (JsonFileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        (store, dir)
    }

    fn snapshot() -> StateSnapshot {
        let mut contracts = BTreeMap::new();
        contracts.insert(NodeId::new(14), ContractId::new(7));
        contracts.insert(NodeId::new(21), ContractId::new(9));
        StateSnapshot::new(contracts, json!({"wg_secret": "abc"}))
    }

    #[test]
    fn missing_file_loads_empty() {
        let (store, _dir) = store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let (store, _dir) = store();
        let expected = snapshot();

        store.save(&expected).unwrap();
        assert_eq!(store.load().unwrap(), expected);
    }

    #[test]
    fn save_replaces_wholesale() {
        let (store, _dir) = store();
        store.save(&snapshot()).unwrap();

        let mut contracts = BTreeMap::new();
        contracts.insert(NodeId::new(99), ContractId::new(1));
        let replacement = StateSnapshot::new(contracts, serde_json::Value::Null);
        store.save(&replacement).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, replacement);
        assert!(!loaded.contracts.contains_key(&NodeId::new(14)));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let (store, dir) = store();
        store.save(&snapshot()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let (store, _dir) = store();
        fs::write(store.path(), b"{not json").unwrap();

        assert!(matches!(store.load(), Err(StateError::Corrupt(_))));
    }
}
