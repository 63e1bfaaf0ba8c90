//! Twin resolution backed by the chain ledger.

use std::sync::Arc;

use async_trait::async_trait;
use gridforge_core::{NodeId, TwinId};
use gridforge_ledger::{ChainApi, LedgerError};
use gridforge_node::{NodeError, TwinResolver};

/// A [`TwinResolver`] that looks twins up on the chain ledger.
///
/// This is the resolver the engine wires into its node pool: one ledger
/// lookup per node, after which the pool caches the client.
pub struct ChainTwinResolver<C: ChainApi> {
    chain: Arc<C>,
}

impl<C: ChainApi> ChainTwinResolver<C> {
    /// Create a resolver over a chain client.
    #[must_use]
    pub fn new(chain: Arc<C>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl<C: ChainApi> TwinResolver for ChainTwinResolver<C> {
    async fn node_twin(&self, node_id: NodeId) -> Result<TwinId, NodeError> {
        self.chain.node_twin(node_id).await.map_err(|e| match e {
            LedgerError::NodeNotFound(node) => NodeError::UnknownNode(node),
            e => NodeError::ResolveFailed {
                node_id,
                reason: e.to_string(),
            },
        })
    }
}
