//! The low-level chain RPC seam.
//!
//! This trait abstracts the chain client, allowing for mock implementations
//! in tests. Implementations translate these calls into the chain's RPC
//! protocol; that transport layer is out of scope for this crate.

use async_trait::async_trait;
use gridforge_core::{ContractId, Identity, NodeId, TwinId};
use gridforge_models::{Contract, DeploymentHash};

use crate::error::Result;

/// Low-level chain ledger operations.
#[async_trait]
pub trait ChainApi: Send + Sync {
    /// Create a node contract sized to a deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain call fails or the identity's account
    /// is unknown.
    async fn create_node_contract(
        &self,
        identity: &dyn Identity,
        node_id: NodeId,
        deployment_hash: DeploymentHash,
        public_ips: u32,
    ) -> Result<ContractId>;

    /// Replace the body hash of an existing node contract.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ContractNotFound` if the contract is gone.
    async fn update_node_contract(
        &self,
        identity: &dyn Identity,
        contract_id: ContractId,
        deployment_hash: DeploymentHash,
    ) -> Result<ContractId>;

    /// Cancel a contract.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ContractNotFound` if the contract is gone.
    async fn cancel_contract(&self, identity: &dyn Identity, contract_id: ContractId)
        -> Result<()>;

    /// Fetch a contract record.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ContractNotFound` if the contract does not
    /// exist.
    async fn get_contract(&self, contract_id: ContractId) -> Result<Contract>;

    /// Reserve a globally-unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain call fails or the name is taken by
    /// another twin.
    async fn create_name_contract(&self, identity: &dyn Identity, name: &str)
        -> Result<ContractId>;

    /// Look up the contract currently holding a name reservation.
    ///
    /// Returns `None` if the name is unreserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain call fails.
    async fn contract_id_by_name(&self, name: &str) -> Result<Option<ContractId>>;

    /// Resolve a node's messaging twin.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NodeNotFound` if the node is unknown.
    async fn node_twin(&self, node_id: NodeId) -> Result<TwinId>;
}
