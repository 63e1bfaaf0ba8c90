//! Contract lifecycle management for gridforge.
//!
//! This crate wraps the chain ledger behind two seams:
//!
//! - [`ChainApi`]: the low-level chain RPC interface, implemented by the
//!   transport layer (out of scope here) and by mocks in tests
//! - [`ContractManager`]: the lifecycle wrapper the engine consumes, which
//!   normalizes ledger-specific failures and makes "no contract" and
//!   "already gone" conditions explicit no-ops
//!
//! All mutating calls take a caller-supplied [`gridforge_core::Identity`];
//! the manager never stores secret material.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chain;
pub mod contracts;
pub mod error;

pub use chain::ChainApi;
pub use contracts::ContractManager;
pub use error::{LedgerError, Result};
