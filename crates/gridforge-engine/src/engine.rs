//! The deployment reconciliation engine.
//!
//! The engine accumulates per-node desired workload sets and converges them
//! against the ledger and the nodes in commit cycles. Its working set is
//! three maps keyed by node:
//!
//! - `deployment_ids`: node → last committed contract, the only durable map
//! - `planned`: node → deployment being assembled since the last commit
//! - `affected`: node → contract of a deployment fetched from its node,
//!   marking it for update rather than create
//!
//! `planned` and `affected` are consumed by every commit; failed nodes lose
//! their unsaved changes and must be re-staged by the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use gridforge_core::{ContractId, Identity, NodeId};
use gridforge_ledger::{ChainApi, ContractManager};
use gridforge_models::{Deployment, SignatureRequirement, Workload};
use gridforge_node::{NodeClient, NodePool};
use gridforge_state::{StateSnapshot, StateStore};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{AggregateError, EngineError, Result};

/// The engine's in-memory working set.
///
/// Guarded by a single mutex: `set_workload` and `commit` are read-modify-
/// write sequences over all three maps and must not interleave.
#[derive(Default)]
struct WorkingSet {
    /// Node → last committed contract. Durable.
    deployment_ids: BTreeMap<NodeId, ContractId>,
    /// Node → deployment assembled since the last commit.
    planned: BTreeMap<NodeId, Deployment>,
    /// Node → contract whose deployment was fetched as an update base.
    affected: BTreeMap<NodeId, ContractId>,
    /// Node → deployment as last committed, kept to answer duplicate-name
    /// checks without a remote fetch. Lost on restart, in which case the
    /// fetch path repopulates it.
    committed: BTreeMap<NodeId, Deployment>,
    /// Opaque caller-owned data persisted alongside the contract map.
    user_data: Value,
}

/// The deployment reconciliation engine.
///
/// One engine instance serves one logical workflow at a time; the working
/// set is internally serialized, so concurrent calls are safe but execute
/// one after another.
pub struct ReconcilerEngine<C: ChainApi, S: StateStore> {
    identity: Arc<dyn Identity>,
    contracts: ContractManager<C>,
    pool: Arc<NodePool>,
    store: S,
    state: Mutex<WorkingSet>,
}

impl<C: ChainApi, S: StateStore> ReconcilerEngine<C, S> {
    /// Create an engine, restoring the node → contract mapping from the
    /// state store.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot cannot be loaded.
    pub fn new(
        identity: Arc<dyn Identity>,
        contracts: ContractManager<C>,
        pool: Arc<NodePool>,
        store: S,
    ) -> Result<Self> {
        let snapshot = store.load()?;

        if !snapshot.contracts.is_empty() {
            tracing::info!(
                contracts = snapshot.contracts.len(),
                "Restored committed contracts from state store"
            );
        }

        Ok(Self {
            identity,
            contracts,
            pool,
            store,
            state: Mutex::new(WorkingSet {
                deployment_ids: snapshot.contracts,
                user_data: snapshot.user_data,
                ..WorkingSet::default()
            }),
        })
    }

    /// The current node → contract mapping.
    pub async fn contract_ids(&self) -> BTreeMap<NodeId, ContractId> {
        self.state.lock().await.deployment_ids.clone()
    }

    /// The opaque user data carried through the state store.
    pub async fn user_data(&self) -> Value {
        self.state.lock().await.user_data.clone()
    }

    /// Replace the opaque user data.
    ///
    /// Persisted with the contract mapping on the next `commit` or
    /// `cancel_all`.
    pub async fn set_user_data(&self, user_data: Value) {
        self.state.lock().await.user_data = user_data;
    }

    /// Add a workload to the node's in-progress deployment.
    ///
    /// The base deployment is, in order of preference: the one already being
    /// assembled for this node, the one committed earlier in this process'
    /// lifetime, the one fetched from the node (when a contract exists from
    /// a previous run), or a fresh deployment signed solely by this engine's
    /// identity. Fetching records the contract in the affected set so the
    /// commit knows to update rather than create; the fetch happens at most
    /// once per node per commit cycle.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DuplicateWorkloadName` if the base already
    /// holds a workload with the same name, and propagates fetch failures
    /// (including `ContractNotFound` when the remote contract is gone — the
    /// engine never synthesizes an empty deployment in its place). The
    /// working set is unchanged on any error.
    pub async fn set_workload(&self, node_id: NodeId, workload: Workload) -> Result<()> {
        let mut state = self.state.lock().await;

        let (mut base, fetched_from) = if let Some(planned) = state.planned.get(&node_id) {
            (planned.clone(), None)
        } else if let Some(committed) = state.committed.get(&node_id) {
            let mut base = committed.clone();
            let contract_id = base.contract_id;
            base.bump_version();
            (base, Some(contract_id))
        } else if let Some(&contract_id) = state.deployment_ids.get(&node_id) {
            let client = self
                .pool
                .get_client(node_id)
                .await
                .map_err(|e| EngineError::from_node(node_id, e))?;
            let mut base = client
                .get(contract_id)
                .await
                .map_err(|e| EngineError::from_node(node_id, e))?;
            base.contract_id = contract_id;
            base.bump_version();

            tracing::debug!(
                node_id = %node_id,
                contract_id = %contract_id,
                version = base.version,
                "Fetched live deployment as update base"
            );

            (base, Some(contract_id))
        } else {
            let twin_id = self.identity.twin_id();
            (
                Deployment::new(twin_id, SignatureRequirement::single(twin_id)),
                None,
            )
        };

        if base.contains_workload(&workload.name) {
            return Err(EngineError::DuplicateWorkloadName {
                node_id,
                name: workload.name,
            });
        }

        let name = workload.name.clone();
        base.workloads.push(workload);

        // All checks passed: mutate the working set in one step.
        if let Some(contract_id) = fetched_from {
            state.affected.insert(node_id, contract_id);
        }
        state.planned.insert(node_id, base);

        tracing::debug!(node_id = %node_id, workload = %name, "Staged workload");

        Ok(())
    }

    /// Converge all staged state with the ledger and the nodes, then persist
    /// the outcome.
    ///
    /// Nodes are reconciled concurrently and independently: a failure on one
    /// node never rolls back or blocks another node's convergence, and
    /// nothing is retried within a single commit. Planned and affected
    /// state is consumed regardless of partial failure — callers re-stage
    /// failed nodes and commit again.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Aggregate` naming each failed node, or
    /// `EngineError::Store` if persisting the refreshed mapping fails.
    pub async fn commit(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        let planned = std::mem::take(&mut state.planned);
        let affected = std::mem::take(&mut state.affected);

        if planned.is_empty() {
            tracing::debug!("Nothing staged, commit is a no-op");
            return Ok(());
        }

        let tasks = planned.into_iter().map(|(node_id, deployment)| {
            let existing = affected.get(&node_id).copied();
            async move {
                let result = self.reconcile_node(node_id, deployment, existing).await;
                (node_id, result)
            }
        });
        let results = join_all(tasks).await;

        let mut errors = BTreeMap::new();
        for (node_id, result) in results {
            match result {
                Ok((contract_id, deployment)) => {
                    state.deployment_ids.insert(node_id, contract_id);
                    state.committed.insert(node_id, deployment);
                    tracing::info!(
                        node_id = %node_id,
                        contract_id = %contract_id,
                        "Committed node"
                    );
                }
                Err(error) => {
                    // The remote may or may not have applied a failed
                    // update; drop the cached copy so the next cycle
                    // re-fetches the truth.
                    state.committed.remove(&node_id);
                    tracing::error!(node_id = %node_id, error = %error, "Node commit failed");
                    errors.insert(node_id, error);
                }
            }
        }

        let snapshot = StateSnapshot::new(state.deployment_ids.clone(), state.user_data.clone());
        self.store.save(&snapshot)?;

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new(errors).into())
        }
    }

    /// Reconcile a single node: create or update its contract, then push the
    /// deployment.
    async fn reconcile_node(
        &self,
        node_id: NodeId,
        mut deployment: Deployment,
        existing: Option<ContractId>,
    ) -> Result<(ContractId, Deployment)> {
        let client = self
            .pool
            .get_client(node_id)
            .await
            .map_err(|e| EngineError::from_node(node_id, e))?;

        let hash = deployment.challenge_hash();

        if let Some(contract_id) = existing {
            deployment.contract_id = contract_id;

            let recorded = self
                .contracts
                .get_contract(contract_id)
                .await
                .map_err(EngineError::from_ledger)?;

            if recorded.deployment_hash() == Some(&hash) {
                tracing::debug!(
                    contract_id = %contract_id,
                    "Body hash unchanged, skipping ledger update"
                );
            } else {
                self.contracts
                    .update_node_contract(&*self.identity, contract_id, hash)
                    .await
                    .map_err(EngineError::from_ledger)?;
            }

            deployment.sign(&*self.identity);
            client
                .update(&deployment)
                .await
                .map_err(|e| EngineError::from_node(node_id, e))?;

            Ok((contract_id, deployment))
        } else {
            let contract_id = self
                .contracts
                .create_node_contract(&*self.identity, node_id, hash, deployment.public_ip_count())
                .await
                .map_err(EngineError::from_ledger)?;

            deployment.contract_id = contract_id;
            deployment.sign(&*self.identity);

            match client.push(&deployment).await {
                Ok(()) => Ok((contract_id, deployment)),
                Err(push_err) => {
                    // Do not leave a paid lease behind a failed first push.
                    if let Err(cancel_err) = self
                        .contracts
                        .cancel_contract(&*self.identity, contract_id)
                        .await
                    {
                        tracing::warn!(
                            node_id = %node_id,
                            contract_id = %contract_id,
                            error = %cancel_err,
                            "Failed to cancel contract after push failure"
                        );
                    }
                    Err(EngineError::from_node(node_id, push_err))
                }
            }
        }
    }

    /// Cancel every tracked contract and clear the working set.
    ///
    /// Safe to call when nothing is deployed. A node leaves the tracked set
    /// only once its cancel succeeds, so calling again after a partial
    /// failure retries exactly the nodes that still need it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Aggregate` naming each node whose cancel
    /// failed, or `EngineError::Store` if persisting fails.
    pub async fn cancel_all(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        state.planned.clear();
        state.affected.clear();

        if state.deployment_ids.is_empty() {
            tracing::debug!("No tracked contracts, cancel is a no-op");
            return Ok(());
        }

        let entries: Vec<(NodeId, ContractId)> = state
            .deployment_ids
            .iter()
            .map(|(&node_id, &contract_id)| (node_id, contract_id))
            .collect();

        let tasks = entries.into_iter().map(|(node_id, contract_id)| async move {
            let result = self
                .contracts
                .cancel_contract(&*self.identity, contract_id)
                .await;
            (node_id, result)
        });
        let results = join_all(tasks).await;

        let mut errors = BTreeMap::new();
        for (node_id, result) in results {
            match result {
                Ok(()) => {
                    state.deployment_ids.remove(&node_id);
                    state.committed.remove(&node_id);
                    tracing::info!(node_id = %node_id, "Canceled node contract");
                }
                Err(error) => {
                    tracing::error!(node_id = %node_id, error = %error, "Cancel failed");
                    errors.insert(node_id, EngineError::from_ledger(error));
                }
            }
        }

        let snapshot = StateSnapshot::new(state.deployment_ids.clone(), state.user_data.clone());
        self.store.save(&snapshot)?;

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new(errors).into())
        }
    }

    /// Get the pooled client for a node.
    ///
    /// # Errors
    ///
    /// Returns an error if twin resolution fails.
    pub async fn node_client(&self, node_id: NodeId) -> Result<Arc<NodeClient>> {
        self.pool
            .get_client(node_id)
            .await
            .map_err(|e| EngineError::from_node(node_id, e))
    }
}
