//! The contract lifecycle manager.
//!
//! Wraps [`ChainApi`] with the normalization rules the engine relies on:
//! a `ContractId` of zero always means "no contract exists yet" and is a
//! no-op for cancel and update, and a contract the ledger reports as already
//! gone cancels successfully.

use std::sync::Arc;

use gridforge_core::{ContractId, Identity, NodeId, TwinId};
use gridforge_models::{Contract, DeploymentHash};

use crate::chain::ChainApi;
use crate::error::{LedgerError, Result};

/// Lifecycle wrapper over the chain ledger.
///
/// Cheap to clone; all clones share the underlying chain client.
pub struct ContractManager<C: ChainApi> {
    chain: Arc<C>,
}

impl<C: ChainApi> Clone for ContractManager<C> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<C: ChainApi> ContractManager<C> {
    /// Create a new manager over a chain client.
    #[must_use]
    pub fn new(chain: Arc<C>) -> Self {
        Self { chain }
    }

    /// Access the underlying chain client.
    #[must_use]
    pub fn chain(&self) -> &Arc<C> {
        &self.chain
    }

    /// Create a node contract sized to a deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain call fails.
    pub async fn create_node_contract(
        &self,
        identity: &dyn Identity,
        node_id: NodeId,
        deployment_hash: DeploymentHash,
        public_ips: u32,
    ) -> Result<ContractId> {
        let contract_id = self
            .chain
            .create_node_contract(identity, node_id, deployment_hash, public_ips)
            .await?;

        tracing::info!(
            node_id = %node_id,
            contract_id = %contract_id,
            public_ips,
            "Created node contract"
        );

        Ok(contract_id)
    }

    /// Replace the body hash of an existing node contract.
    ///
    /// Updating the "no contract" sentinel is a no-op success and performs
    /// no ledger call.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ContractNotFound` if the contract is gone.
    pub async fn update_node_contract(
        &self,
        identity: &dyn Identity,
        contract_id: ContractId,
        deployment_hash: DeploymentHash,
    ) -> Result<ContractId> {
        if contract_id.is_none() {
            tracing::debug!("Skipping update of absent contract");
            return Ok(contract_id);
        }

        let contract_id = self
            .chain
            .update_node_contract(identity, contract_id, deployment_hash)
            .await?;

        tracing::info!(
            contract_id = %contract_id,
            hash = %deployment_hash,
            "Updated node contract"
        );

        Ok(contract_id)
    }

    /// Cancel a contract.
    ///
    /// Canceling the "no contract" sentinel, or a contract the ledger
    /// reports as already gone, succeeds without error.
    ///
    /// # Errors
    ///
    /// Returns an error on unexpected ledger failures.
    pub async fn cancel_contract(
        &self,
        identity: &dyn Identity,
        contract_id: ContractId,
    ) -> Result<()> {
        if contract_id.is_none() {
            tracing::debug!("Skipping cancel of absent contract");
            return Ok(());
        }

        match self.chain.cancel_contract(identity, contract_id).await {
            Ok(()) => {
                tracing::info!(contract_id = %contract_id, "Canceled contract");
                Ok(())
            }
            Err(LedgerError::ContractNotFound(_)) => {
                tracing::debug!(contract_id = %contract_id, "Contract already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Check whether a previously known contract is still alive.
    ///
    /// Returns false for the "no contract" sentinel, for a contract in a
    /// non-created state, and for a contract the ledger no longer knows.
    ///
    /// # Errors
    ///
    /// Returns an error only on unexpected ledger failures.
    pub async fn is_valid_contract(&self, contract_id: ContractId) -> Result<bool> {
        if contract_id.is_none() {
            return Ok(false);
        }

        match self.chain.get_contract(contract_id).await {
            Ok(contract) => Ok(contract.is_created()),
            Err(LedgerError::ContractNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch a contract record.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ContractNotFound` if the contract does not
    /// exist.
    pub async fn get_contract(&self, contract_id: ContractId) -> Result<Contract> {
        if contract_id.is_none() {
            return Err(LedgerError::ContractNotFound(contract_id));
        }
        self.chain.get_contract(contract_id).await
    }

    /// Reserve a globally-unique name, reusing a live reservation already
    /// held by this identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain call fails or the name is held by
    /// another twin.
    pub async fn reserve_name(&self, identity: &dyn Identity, name: &str) -> Result<ContractId> {
        if let Some(existing) = self.chain.contract_id_by_name(name).await? {
            let contract = self.chain.get_contract(existing).await?;
            if contract.is_created()
                && contract.name() == Some(name)
                && contract.twin_id == identity.twin_id()
            {
                tracing::debug!(contract_id = %existing, name, "Reusing name reservation");
                return Ok(existing);
            }
        }

        let contract_id = self.chain.create_name_contract(identity, name).await?;
        tracing::info!(contract_id = %contract_id, name, "Reserved name");
        Ok(contract_id)
    }

    /// Validate a previously tracked name reservation, replacing it if it is
    /// stale.
    ///
    /// A reservation found bound to a different name than requested, or no
    /// longer alive, is canceled and replaced with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain calls fail.
    pub async fn validate_name_contract(
        &self,
        identity: &dyn Identity,
        contract_id: ContractId,
        name: &str,
    ) -> Result<ContractId> {
        if !contract_id.is_none() {
            match self.chain.get_contract(contract_id).await {
                Ok(contract) if contract.is_created() && contract.name() == Some(name) => {
                    return Ok(contract_id);
                }
                Ok(contract) => {
                    // Stale reservation: wrong name or dying contract.
                    tracing::warn!(
                        contract_id = %contract_id,
                        bound = ?contract.name(),
                        requested = name,
                        "Replacing stale name reservation"
                    );
                    self.cancel_contract(identity, contract_id).await?;
                }
                Err(LedgerError::ContractNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        self.reserve_name(identity, name).await
    }

    /// Resolve a node's messaging twin.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NodeNotFound` if the node is unknown.
    pub async fn node_twin(&self, node_id: NodeId) -> Result<TwinId> {
        self.chain.node_twin(node_id).await
    }
}
