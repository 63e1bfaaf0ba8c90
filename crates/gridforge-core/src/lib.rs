//! Core types and utilities for gridforge.
//!
//! This crate provides the foundational types used throughout the gridforge
//! platform:
//!
//! - **Identifiers**: Strongly-typed IDs for nodes, twins, and contracts
//! - **Identity**: The polymorphic signing capability used to authorize
//!   ledger mutations and sign deployments
//! - **Error types**: Common error definitions shared across crates
//!
//! # Example
//!
//! ```
//! use gridforge_core::{ContractId, Ed25519Identity, Identity, NodeId, TwinId};
//!
//! let node = NodeId::new(14);
//! let twin = TwinId::new(42);
//!
//! // No contract yet; contract ID zero is the "absent" sentinel.
//! let contract = ContractId::NONE;
//! assert!(contract.is_none());
//!
//! // Sign something with a generated identity.
//! let identity = Ed25519Identity::generate(twin);
//! let signature = identity.sign(b"payload");
//! assert!(identity.verify(b"payload", &signature));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod identity;
pub mod ids;

pub use error::{CoreError, Result};
pub use identity::{Ed25519Identity, Identity, SignatureScheme};
pub use ids::{ContractId, NodeId, TwinId};
