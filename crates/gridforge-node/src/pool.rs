//! Client pool with cached twin resolution.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gridforge_core::{NodeId, TwinId};
use tokio::sync::Mutex;

use crate::bus::NodeBus;
use crate::client::NodeClient;
use crate::error::Result;

/// Default per-call timeout for clients handed out by the pool.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves a node to its messaging twin.
///
/// Resolution is one ledger lookup; the pool calls it at most once per node.
#[async_trait::async_trait]
pub trait TwinResolver: Send + Sync {
    /// Look up the twin that routes to `node_id`.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::UnknownNode` if the node does not exist.
    async fn node_twin(&self, node_id: NodeId) -> Result<TwinId>;
}

/// A pool of per-node clients.
///
/// The first request for a node resolves its twin and caches the client for
/// the pool's lifetime; subsequent requests are map lookups with no network
/// access. The cache map is guarded by an async mutex held across
/// resolution, so a single uncached node is never resolved twice.
pub struct NodePool {
    resolver: Arc<dyn TwinResolver>,
    bus: Arc<dyn NodeBus>,
    timeout: Duration,
    clients: Mutex<HashMap<NodeId, Arc<NodeClient>>>,
}

impl NodePool {
    /// Create a pool with the default call timeout.
    #[must_use]
    pub fn new(resolver: Arc<dyn TwinResolver>, bus: Arc<dyn NodeBus>) -> Self {
        Self::with_timeout(resolver, bus, DEFAULT_CALL_TIMEOUT)
    }

    /// Create a pool with a custom per-call timeout.
    #[must_use]
    pub fn with_timeout(
        resolver: Arc<dyn TwinResolver>,
        bus: Arc<dyn NodeBus>,
        timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            bus,
            timeout,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Get the client for a node, resolving its twin on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if twin resolution fails.
    pub async fn get_client(&self, node_id: NodeId) -> Result<Arc<NodeClient>> {
        let mut clients = self.clients.lock().await;

        if let Some(client) = clients.get(&node_id) {
            return Ok(Arc::clone(client));
        }

        let twin_id = self.resolver.node_twin(node_id).await?;
        tracing::debug!(node_id = %node_id, twin_id = %twin_id, "Resolved node twin");

        let client = Arc::new(NodeClient::new(
            node_id,
            twin_id,
            Arc::clone(&self.bus),
            self.timeout,
        ));
        clients.insert(node_id, Arc::clone(&client));
        Ok(client)
    }

    /// Number of cached clients.
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// True if no clients are cached yet.
    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }

    /// Drop all cached clients, forcing re-resolution on next use.
    pub async fn clear(&self) {
        self.clients.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::commands;
    use crate::error::NodeError;
    use gridforge_core::ContractId;
    use parking_lot::Mutex as SyncMutex;
    use serde_json::{json, Value};

    struct CountingResolver {
        calls: SyncMutex<u32>,
    }

    #[async_trait::async_trait]
    impl TwinResolver for CountingResolver {
        async fn node_twin(&self, node_id: NodeId) -> Result<TwinId> {
            *self.calls.lock() += 1;
            if node_id.value() == 0 {
                return Err(NodeError::UnknownNode(node_id));
            }
            Ok(TwinId::new(node_id.value() + 100))
        }
    }

    /// A bus whose behavior is keyed by command name.
    struct ScriptedBus;

    #[async_trait::async_trait]
    impl NodeBus for ScriptedBus {
        async fn call(
            &self,
            twin: TwinId,
            command: &str,
            _payload: Value,
            timeout: Duration,
        ) -> Result<Value> {
            match command {
                commands::PING => Ok(json!("pong")),
                commands::DELETE => Err(NodeError::Rejected {
                    twin,
                    command: command.to_string(),
                    reason: "workloads still running".to_string(),
                }),
                _ => Err(NodeError::Timeout {
                    twin,
                    command: command.to_string(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            }
        }
    }

    fn pool() -> (NodePool, Arc<CountingResolver>) {
        let resolver = Arc::new(CountingResolver {
            calls: SyncMutex::new(0),
        });
        let pool = NodePool::new(Arc::clone(&resolver) as Arc<dyn TwinResolver>, Arc::new(ScriptedBus));
        (pool, resolver)
    }

    #[tokio::test]
    async fn twin_resolved_once_per_node() {
        let (pool, resolver) = pool();
        let node = NodeId::new(14);

        let a = pool.get_client(node).await.unwrap();
        let b = pool.get_client(node).await.unwrap();

        assert_eq!(a.twin_id(), b.twin_id());
        assert_eq!(*resolver.calls.lock(), 1);
        assert_eq!(pool.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_node_is_not_cached() {
        let (pool, resolver) = pool();

        let result = pool.get_client(NodeId::new(0)).await;
        assert!(matches!(result, Err(NodeError::UnknownNode(_))));
        assert!(pool.is_empty().await);

        // A retry re-attempts resolution rather than caching the failure.
        let _ = pool.get_client(NodeId::new(0)).await;
        assert_eq!(*resolver.calls.lock(), 2);
    }

    #[tokio::test]
    async fn clear_forces_re_resolution() {
        let (pool, resolver) = pool();
        let node = NodeId::new(14);

        pool.get_client(node).await.unwrap();
        pool.clear().await;
        pool.get_client(node).await.unwrap();

        assert_eq!(*resolver.calls.lock(), 2);
    }

    #[tokio::test]
    async fn reachable_when_node_answers() {
        let (pool, _resolver) = pool();
        let client = pool.get_client(NodeId::new(14)).await.unwrap();

        assert!(client.is_reachable(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn rejection_is_not_unreachable() {
        let (pool, _resolver) = pool();
        let client = pool.get_client(NodeId::new(14)).await.unwrap();

        // DELETE is scripted to answer with a refusal: the node is up.
        let err = client.delete(ContractId::new(7)).await.unwrap_err();
        assert!(!err.is_unreachable());
        assert!(matches!(err, NodeError::Rejected { .. }));
    }

    #[tokio::test]
    async fn timeout_is_unreachable() {
        let (pool, _resolver) = pool();
        let client = pool.get_client(NodeId::new(14)).await.unwrap();

        let err = client
            .get(ContractId::new(7))
            .await
            .unwrap_err();
        assert!(err.is_unreachable());
    }
}
