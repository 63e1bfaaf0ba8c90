//! Workloads: opaque named units of desired resource.
//!
//! A workload is identified by its name within the deployment that contains
//! it. The engine never interprets the payload; it is an opaque serializable
//! blob understood only by the remote node.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of resource a workload provisions.
///
/// The engine treats all kinds uniformly except [`WorkloadKind::PublicIp`],
/// which it counts when sizing the node contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    /// A virtual machine instance.
    Vm,
    /// A mountable disk volume.
    Disk,
    /// A reserved public IP address.
    PublicIp,
    /// A gateway (name or FQDN proxy) entry.
    Gateway,
    /// A key-value store namespace.
    KeyValueStore,
    /// A managed cluster node.
    ClusterNode,
    /// An aggregation filesystem backed by remote stores.
    AggregationFs,
}

impl WorkloadKind {
    /// The canonical wire name for this kind, as used in challenge hashing
    /// and bus payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vm => "vm",
            Self::Disk => "disk",
            Self::PublicIp => "public_ip",
            Self::Gateway => "gateway",
            Self::KeyValueStore => "key_value_store",
            Self::ClusterNode => "cluster_node",
            Self::AggregationFs => "aggregation_fs",
        }
    }
}

/// A single named unit of desired resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Version of this workload within its deployment, bumped on update.
    pub version: u32,
    /// Name, unique within the owning deployment.
    pub name: String,
    /// The resource kind.
    pub kind: WorkloadKind,
    /// Opaque kind-specific payload, uninterpreted by the engine.
    pub payload: Value,
}

impl Workload {
    /// Create a new workload at version zero.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: WorkloadKind, payload: Value) -> Self {
        Self {
            version: 0,
            name: name.into(),
            kind,
            payload,
        }
    }
}
