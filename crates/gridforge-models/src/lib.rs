//! Domain types for gridforge.
//!
//! This crate defines the data model shared by the ledger, node, and engine
//! crates:
//!
//! - **Workloads**: opaque named units of desired resource
//! - **Deployments**: the ordered workload set destined for one node under
//!   one contract, with its stable content hash and signatures
//! - **Contracts**: ledger-anchored leases binding a requester, a node, and
//!   a deployment hash
//!
//! The engine never interprets workload payloads; it only relies on names
//! being unique within a deployment and on the deployment's content hash
//! being stable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod contract;
pub mod deployment;
pub mod error;
pub mod workload;

pub use contract::{Contract, ContractKind, ContractState};
pub use deployment::{
    Deployment, DeploymentHash, DeploymentSignature, SignatureRequest, SignatureRequirement,
};
pub use error::{ModelError, Result};
pub use workload::{Workload, WorkloadKind};
