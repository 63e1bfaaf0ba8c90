//! The deployment reconciliation engine for gridforge.
//!
//! The engine turns a batch of "set workload W on node N" calls into ledger
//! and node side effects, exactly once per commit cycle, and keeps three
//! independently-failing systems consistent under partial failure: the local
//! intent, the contract ledger, and the remote nodes.
//!
//! # Usage
//!
//! Stage workloads with [`ReconcilerEngine::set_workload`], then converge
//! with [`ReconcilerEngine::commit`]. Per-node failures during a commit are
//! isolated: succeeded nodes are committed and persisted, failed nodes are
//! reported in an [`AggregateError`] and must be re-staged by the caller.
//! [`ReconcilerEngine::cancel_all`] tears everything down, retrying only
//! still-tracked nodes when called again after a partial failure.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod error;
pub mod resolver;

pub use engine::ReconcilerEngine;
pub use error::{AggregateError, EngineError, Result};
pub use resolver::ChainTwinResolver;
