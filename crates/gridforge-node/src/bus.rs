//! The message-bus call seam.

use std::time::Duration;

use async_trait::async_trait;
use gridforge_core::TwinId;
use serde_json::Value;

use crate::error::Result;

/// Bus command names understood by nodes.
pub mod commands {
    /// Push a full deployment to a node.
    pub const DEPLOY: &str = "deployment.deploy";
    /// Push an updated deployment to a node.
    pub const UPDATE: &str = "deployment.update";
    /// Fetch the deployment backing a contract.
    pub const GET: &str = "deployment.get";
    /// Delete the deployment backing a contract.
    pub const DELETE: &str = "deployment.delete";
    /// List per-workload change records for a contract.
    pub const CHANGES: &str = "deployment.changes";
    /// Liveness probe.
    pub const PING: &str = "system.ping";
}

/// One round-trip call over the message bus.
///
/// Implementations route the call to the twin's queue and wait up to
/// `timeout` for the reply. The wire protocol is out of scope; tests
/// implement this trait directly.
#[async_trait]
pub trait NodeBus: Send + Sync {
    /// Send `command` with `payload` to `twin` and return the reply.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::Unreachable`/`Timeout` when the twin never
    /// answers, and `NodeError::Rejected` when it answers with a refusal.
    async fn call(
        &self,
        twin: TwinId,
        command: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<Value>;
}
