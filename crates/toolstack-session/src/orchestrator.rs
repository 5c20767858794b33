//! Per-session façade over the connection and the registries.
//!
//! One orchestrator holds the whole state of one user session. Nothing
//! here is shared between orchestrators except the immutable client.

use std::sync::Arc;

use toolstack_core::{ModelId, RemoteClient, ServiceConfig, SessionId, ToolGroup};
use tracing::warn;

use crate::{
    connection::ConnectionManager,
    error::Outcome,
    registry::{CustomTool, PluginRegistry, PluginServer, ToolRegistry},
};

/// Message returned by a successful connect.
pub const CONNECTED: &str = "Connected";

/// Session orchestrator.
pub struct SessionOrchestrator<C: RemoteClient + ?Sized> {
    connection: ConnectionManager<C>,
    tools: ToolRegistry,
    plugins: PluginRegistry,
}

impl<C: RemoteClient + ?Sized> SessionOrchestrator<C> {
    /// Create a disconnected orchestrator with empty registries.
    #[must_use]
    pub fn new(client: Arc<C>, config: ServiceConfig) -> Self {
        Self {
            connection: ConnectionManager::new(client, config),
            tools: ToolRegistry::new(),
            plugins: PluginRegistry::new(),
        }
    }

    /// Connect, or rebuild the agent and session if already connected.
    pub async fn connect(&mut self) -> Outcome {
        self.connection
            .connect()
            .await
            .map(|()| CONNECTED.to_string())
            .into()
    }

    /// Whether an agent session is live.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Send a message and return the agent's reply.
    ///
    /// Connects first if needed. Never fails: connection and turn errors
    /// come back as descriptive text in place of the reply.
    pub async fn chat(&mut self, message: &str) -> String {
        if !self.connection.is_connected() {
            if let Err(e) = self.connection.connect().await {
                return format!("Connection failed: {e}");
            }
        }

        match self.connection.submit_turn(message).await {
            Ok(reply) => reply.content,
            Err(e) => {
                warn!("turn failed: {e}");
                format!("Error: {e}")
            }
        }
    }

    /// Built-ins, then `custom::*`, then `mcp::*`.
    #[must_use]
    pub fn available_tools(&self) -> Vec<String> {
        let mut names = self.tools.list_tools();
        names.extend(self.plugins.qualified_names());
        names
    }

    /// Register a custom tool.
    pub fn register_tool(&mut self, name: &str, description: &str, source: &str) -> Outcome {
        Outcome::success(self.tools.register(name, description, source))
    }

    /// Register a plugin server; rebuilds the agent on success.
    pub async fn register_plugin(
        &mut self,
        name: &str,
        endpoint_url: &str,
        description: &str,
        auth_token: &str,
    ) -> Outcome {
        self.plugins
            .register(
                &mut self.connection,
                name,
                endpoint_url,
                description,
                auth_token,
            )
            .await
            .into()
    }

    /// Unregister a plugin server; rebuilds the agent on success.
    pub async fn unregister_plugin(&mut self, name: &str) -> Outcome {
        self.plugins
            .unregister(&mut self.connection, name)
            .await
            .into()
    }

    /// Registered plugin servers in registration order.
    #[must_use]
    pub fn list_plugins(&self) -> Vec<PluginServer> {
        self.plugins.list()
    }

    /// Registered custom tools in registration order.
    #[must_use]
    pub fn custom_tools(&self) -> Vec<CustomTool> {
        self.tools.iter().cloned().collect()
    }

    /// Toolgroups currently registered on the service. Best effort.
    pub async fn list_remote_toolgroups(&self) -> Vec<ToolGroup> {
        self.connection.list_remote_toolgroups().await
    }

    /// Active model, if connected.
    #[must_use]
    pub fn model_id(&self) -> Option<&ModelId> {
        self.connection.live().map(|live| &live.model_id)
    }

    /// Active conversation session, if connected.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.connection.live().map(|live| &live.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::BUILTIN_TOOLS, testing::FakeService};

    fn orchestrator(service: &Arc<FakeService>) -> SessionOrchestrator<FakeService> {
        SessionOrchestrator::new(Arc::clone(service), ServiceConfig::default())
    }

    #[tokio::test]
    async fn test_connect_outcome() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);

        assert_eq!(orch.connect().await, Outcome::success("Connected"));
        assert!(orch.is_connected());
        assert_eq!(orch.model_id().map(String::as_str), Some("m"));
        assert!(orch.session_id().is_some());
    }

    #[tokio::test]
    async fn test_connect_twice_yields_fresh_sessions() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);

        assert!(orch.connect().await.ok);
        let first = orch.session_id().cloned();
        assert!(orch.connect().await.ok);

        assert_ne!(orch.session_id().cloned(), first);
    }

    #[tokio::test]
    async fn test_connect_failure_outcome() {
        let service = Arc::new(FakeService::default());
        let mut orch = orchestrator(&service);

        let outcome = orch.connect().await;

        assert!(!outcome.ok);
        assert!(outcome.message.contains("No models available"));
        assert!(!orch.is_connected());
        assert!(orch.model_id().is_none());
    }

    #[tokio::test]
    async fn test_chat_connects_implicitly() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);

        let reply = orch.chat("hi").await;

        assert_eq!(reply, "echo: hi");
        assert!(orch.is_connected());
    }

    #[tokio::test]
    async fn test_chat_reuses_session_within_connection() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);

        orch.chat("one").await;
        orch.chat("two").await;

        let turns = service.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].session_id, turns[1].session_id);
        assert_eq!(service.agents().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_reports_connection_failure() {
        let service = Arc::new(FakeService::with_model("m"));
        service.set_unreachable(true);
        let mut orch = orchestrator(&service);

        let reply = orch.chat("hi").await;

        assert!(reply.starts_with("Connection failed: "));
        assert!(reply.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_chat_reports_turn_failure() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);
        assert!(orch.connect().await.ok);
        service.set_fail_turns(true);

        let reply = orch.chat("hi").await;

        assert!(reply.starts_with("Error: "));
        assert!(reply.contains("inference failed"));
        assert!(orch.is_connected());
    }

    #[tokio::test]
    async fn test_available_tools_category_order() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);
        assert!(orch.connect().await.ok);

        assert!(orch.register_plugin("gh", "http://gh/sse", "", "").await.ok);
        assert!(orch.register_tool("calc", "adds", "def calc(): ...").ok);

        assert_eq!(
            orch.available_tools(),
            vec![
                "builtin::code_interpreter",
                "builtin::websearch",
                "builtin::wolfram_alpha",
                "custom::calc",
                "mcp::gh",
            ]
        );
    }

    #[test]
    fn test_available_tools_start_with_builtins() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);
        assert!(orch.register_tool("zzz", "", "").ok);

        assert_eq!(orch.available_tools()[..3], BUILTIN_TOOLS);
    }

    #[test]
    fn test_register_tool_accepts_empty_name() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);

        assert_eq!(orch.register_tool("", "d", "c"), Outcome::success("Tool registered"));

        assert_eq!(orch.available_tools().len(), BUILTIN_TOOLS.len() + 1);
        assert_eq!(orch.available_tools().last().map(String::as_str), Some("custom::"));
    }

    #[test]
    fn test_remote_toolgroups_empty_before_connect() {
        let service = Arc::new(FakeService::with_model("m"));
        let orch = orchestrator(&service);

        assert!(tokio_test::block_on(orch.list_remote_toolgroups()).is_empty());
    }

    #[tokio::test]
    async fn test_plugin_round_trip() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);
        assert!(orch.connect().await.ok);

        let outcome = orch.register_plugin("x", "http://h/sse", "", "").await;
        assert_eq!(outcome, Outcome::success("x registered"));
        let listed = orch.list_plugins();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].endpoint_url, "http://h/sse");
        assert_eq!(listed[0].toolgroup_id, "mcp::x");
        assert!(
            orch.list_remote_toolgroups()
                .await
                .iter()
                .any(|g| g.identifier == "mcp::x")
        );

        assert!(orch.unregister_plugin("x").await.ok);
        assert!(orch.list_plugins().iter().all(|p| p.name != "x"));
    }

    #[tokio::test]
    async fn test_plugin_mutation_while_disconnected() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);

        let register = orch.register_plugin("x", "http://h/sse", "", "").await;
        let unregister = orch.unregister_plugin("x").await;

        assert_eq!(register, Outcome::failure("Not connected to the model service"));
        assert_eq!(unregister, Outcome::failure("Not connected to the model service"));
        assert!(orch.list_plugins().is_empty());
    }

    #[tokio::test]
    async fn test_registries_survive_reconnect() {
        let service = Arc::new(FakeService::with_model("m"));
        let mut orch = orchestrator(&service);
        assert!(orch.connect().await.ok);
        assert!(orch.register_tool("t", "d", "c").ok);
        assert!(orch.register_plugin("x", "http://h/sse", "", "").await.ok);

        assert!(orch.connect().await.ok);

        assert_eq!(orch.custom_tools().len(), 1);
        assert_eq!(orch.list_plugins().len(), 1);
    }
}
