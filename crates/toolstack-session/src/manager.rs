//! Host for many independent orchestrator sessions.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};
use toolstack_core::{RemoteClient, ServiceConfig};
use tracing::info;
use uuid::Uuid;

use crate::orchestrator::SessionOrchestrator;

/// Identifier of a hosted session.
pub type HostSessionId = Uuid;

/// An orchestrator behind its per-session lock.
///
/// Calls against one session are serialised by the lock, so a reconnect
/// replaces agent and session atomically from the caller's view.
pub type SharedOrchestrator<C> = Arc<Mutex<SessionOrchestrator<C>>>;

/// Session host.
///
/// Each session gets its own connection and registries; sessions share
/// only the client and configuration, neither of which is mutated.
pub struct SessionHost<C: RemoteClient + ?Sized> {
    client: Arc<C>,
    config: ServiceConfig,
    sessions: RwLock<HashMap<HostSessionId, SharedOrchestrator<C>>>,
}

impl<C: RemoteClient + ?Sized> SessionHost<C> {
    /// Create a host with no sessions.
    #[must_use]
    pub fn new(client: Arc<C>, config: ServiceConfig) -> Self {
        Self {
            client,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a fresh, disconnected session.
    pub async fn open(&self) -> (HostSessionId, SharedOrchestrator<C>) {
        let id = Uuid::new_v4();
        let orchestrator = Arc::new(Mutex::new(SessionOrchestrator::new(
            Arc::clone(&self.client),
            self.config.clone(),
        )));

        self.sessions
            .write()
            .await
            .insert(id, Arc::clone(&orchestrator));
        info!(session = %id, "session opened");

        (id, orchestrator)
    }

    /// Get a session by ID.
    pub async fn get(&self, id: HostSessionId) -> Option<SharedOrchestrator<C>> {
        self.sessions.read().await.get(&id).map(Arc::clone)
    }

    /// Close a session. Returns whether it existed.
    pub async fn close(&self, id: HostSessionId) -> bool {
        let existed = self.sessions.write().await.remove(&id).is_some();
        if existed {
            info!(session = %id, "session closed");
        }
        existed
    }

    /// Number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are open.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeService;

    fn host() -> SessionHost<FakeService> {
        SessionHost::new(
            Arc::new(FakeService::with_model("m")),
            ServiceConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let host = host();
        let (_, a) = host.open().await;
        let (_, b) = host.open().await;

        {
            let mut a = a.lock().await;
            assert!(a.connect().await.ok);
            assert!(a.register_tool("only-a", "", "").ok);
            assert!(a.register_plugin("x", "http://h/sse", "", "").await.ok);
        }

        let b = b.lock().await;
        assert!(!b.is_connected());
        assert!(b.custom_tools().is_empty());
        assert!(b.list_plugins().is_empty());
    }

    #[tokio::test]
    async fn test_open_get_close() {
        let host = host();
        let (id, _) = host.open().await;
        assert_eq!(host.len().await, 1);
        assert!(host.get(id).await.is_some());

        assert!(host.close(id).await);
        assert!(!host.close(id).await);
        assert!(host.get(id).await.is_none());
        assert!(host.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_sessions() {
        let host = Arc::new(host());
        let mut handles = Vec::new();
        for i in 0..8 {
            let host = Arc::clone(&host);
            handles.push(tokio::spawn(async move {
                let (_, orch) = host.open().await;
                let mut orch = orch.lock().await;
                orch.chat(&format!("msg {i}")).await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), format!("echo: msg {i}"));
        }
        assert_eq!(host.len().await, 8);
    }
}
