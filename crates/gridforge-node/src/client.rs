//! Per-node deployment operations.

use std::sync::Arc;
use std::time::Duration;

use gridforge_core::{ContractId, NodeId, TwinId};
use gridforge_models::{Deployment, Workload};
use serde_json::{json, Value};

use crate::bus::{commands, NodeBus};
use crate::error::{NodeError, Result};

/// A handle to one node, bound to its resolved twin.
///
/// Obtained from [`crate::NodePool::get_client`]; cheap to clone via `Arc`.
pub struct NodeClient {
    node_id: NodeId,
    twin_id: TwinId,
    bus: Arc<dyn NodeBus>,
    timeout: Duration,
}

impl NodeClient {
    /// Create a client for a node whose twin is already resolved.
    #[must_use]
    pub fn new(node_id: NodeId, twin_id: TwinId, bus: Arc<dyn NodeBus>, timeout: Duration) -> Self {
        Self {
            node_id,
            twin_id,
            bus,
            timeout,
        }
    }

    /// The node this client addresses.
    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// The resolved messaging twin.
    #[must_use]
    pub const fn twin_id(&self) -> TwinId {
        self.twin_id
    }

    async fn call(&self, command: &str, payload: Value) -> Result<Value> {
        self.bus
            .call(self.twin_id, command, payload, self.timeout)
            .await
    }

    fn encode(command: &str, deployment: &Deployment) -> Result<Value> {
        serde_json::to_value(deployment).map_err(|e| NodeError::Decode {
            command: command.to_string(),
            reason: e.to_string(),
        })
    }

    /// Push a full deployment to the node.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::Unreachable` if the node never answers, or
    /// `NodeError::Rejected` if it refuses the deployment.
    pub async fn push(&self, deployment: &Deployment) -> Result<()> {
        let payload = Self::encode(commands::DEPLOY, deployment)?;
        self.call(commands::DEPLOY, payload).await?;

        tracing::info!(
            node_id = %self.node_id,
            contract_id = %deployment.contract_id,
            workloads = deployment.workloads.len(),
            "Pushed deployment"
        );

        Ok(())
    }

    /// Push an updated deployment to the node.
    ///
    /// The node applies the update idempotently against the deployment it
    /// already runs for the same contract.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::Unreachable` or `NodeError::Rejected` as for
    /// [`NodeClient::push`].
    pub async fn update(&self, deployment: &Deployment) -> Result<()> {
        let payload = Self::encode(commands::UPDATE, deployment)?;
        self.call(commands::UPDATE, payload).await?;

        tracing::info!(
            node_id = %self.node_id,
            contract_id = %deployment.contract_id,
            version = deployment.version,
            "Pushed deployment update"
        );

        Ok(())
    }

    /// Fetch the deployment currently backing a contract on this node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is unreachable, rejects the request, or
    /// replies with something that does not decode as a deployment.
    pub async fn get(&self, contract_id: ContractId) -> Result<Deployment> {
        let reply = self
            .call(commands::GET, json!({ "contract_id": contract_id }))
            .await?;

        serde_json::from_value(reply).map_err(|e| NodeError::Decode {
            command: commands::GET.to_string(),
            reason: e.to_string(),
        })
    }

    /// Delete the deployment backing a contract on this node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is unreachable or rejects the request.
    pub async fn delete(&self, contract_id: ContractId) -> Result<()> {
        self.call(commands::DELETE, json!({ "contract_id": contract_id }))
            .await?;

        tracing::info!(
            node_id = %self.node_id,
            contract_id = %contract_id,
            "Deleted deployment"
        );

        Ok(())
    }

    /// Fetch per-workload change records for a contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is unreachable, rejects the request, or
    /// replies with something that does not decode.
    pub async fn changes(&self, contract_id: ContractId) -> Result<Vec<Workload>> {
        let reply = self
            .call(commands::CHANGES, json!({ "contract_id": contract_id }))
            .await?;

        serde_json::from_value(reply).map_err(|e| NodeError::Decode {
            command: commands::CHANGES.to_string(),
            reason: e.to_string(),
        })
    }

    /// Probe whether the node answers within `timeout`.
    ///
    /// A node that answers with a refusal is still reachable; only a silent
    /// node (no route, timeout) counts as down.
    pub async fn is_reachable(&self, timeout: Duration) -> bool {
        match self
            .bus
            .call(self.twin_id, commands::PING, Value::Null, timeout)
            .await
        {
            Ok(_) => true,
            Err(e) => !e.is_unreachable(),
        }
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("node_id", &self.node_id)
            .field("twin_id", &self.twin_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
