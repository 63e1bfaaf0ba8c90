//! Message-bus node client and pool for gridforge.
//!
//! Nodes are reachable only via their messaging twin. This crate translates
//! logical remote-deployment operations into bus calls and avoids
//! re-resolving node addressing per call:
//!
//! - [`NodeBus`]: the single call seam to the message bus (transport is out
//!   of scope; mocks implement it in tests)
//! - [`NodeClient`]: per-node handle exposing deployment push/update/get/
//!   delete/changes and a liveness check
//! - [`NodePool`]: resolves a node's twin once via [`TwinResolver`] and
//!   caches the client for the pool's lifetime

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bus;
pub mod client;
pub mod error;
pub mod pool;

pub use bus::{commands, NodeBus};
pub use client::NodeClient;
pub use error::{NodeError, Result};
pub use pool::{NodePool, TwinResolver};
