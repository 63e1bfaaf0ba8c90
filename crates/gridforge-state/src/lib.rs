//! Durable state storage for gridforge.
//!
//! The engine owns exactly one persisted artifact: the mapping from node to
//! last-committed contract ID, plus an opaque user-data blob (e.g. generated
//! network secrets). This crate stores that snapshot:
//!
//! - [`StateStore`]: the storage trait, swappable per backend
//! - [`JsonFileStore`]: a JSON file replaced atomically via
//!   write-to-temp-then-rename
//! - [`MemoryStore`]: an in-memory backend for tests
//!
//! # Example
//!
//! ```no_run
//! use gridforge_state::{JsonFileStore, StateSnapshot, StateStore};
//! use gridforge_core::{ContractId, NodeId};
//!
//! let store = JsonFileStore::new("/var/lib/gridforge/state.json");
//!
//! let mut snapshot = StateSnapshot::default();
//! snapshot.contracts.insert(NodeId::new(14), ContractId::new(7));
//! store.save(&snapshot).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod file;
pub mod memory;
pub mod snapshot;

pub use error::{Result, StateError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::StateSnapshot;

/// The storage trait for the engine's durable snapshot.
///
/// `save` must be atomic from the caller's point of view: a crash during a
/// save never leaves a store whose `load` parses into a partial mapping.
/// Concurrent writers are not supported.
pub trait StateStore: Send + Sync {
    /// Load the current snapshot.
    ///
    /// A store that has never been written loads the empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored data is corrupt.
    fn load(&self) -> Result<StateSnapshot>;

    /// Replace the stored snapshot wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; on error the previously
    /// stored snapshot remains intact.
    fn save(&self, snapshot: &StateSnapshot) -> Result<()>;
}

impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    fn load(&self) -> Result<StateSnapshot> {
        (**self).load()
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }
}
