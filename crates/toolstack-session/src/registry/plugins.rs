//! Remote plugin servers, mirrored against the service's toolgroups.
//!
//! Every mutation follows the same contract:
//! 1. require a live connection,
//! 2. apply the change remotely,
//! 3. apply it locally,
//! 4. rebuild the agent with [`ConnectionManager::connect`] so the new
//!    toolgroup snapshot is visible.
//!
//! Step 4 is not transactional with steps 2-3. If the rebuild fails the
//! local record stays and the connection drops to disconnected; the next
//! successful connect picks the change up.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use toolstack_core::{MCP_PROVIDER_ID, RemoteClient, ToolGroupRegistration};
use tracing::{info, warn};

use crate::{connection::ConnectionManager, error::SessionError};

const MCP_PREFIX: &str = "mcp";

/// Toolgroup identifier for a plugin name (`mcp::<name>`).
#[must_use]
pub fn toolgroup_id_for(name: &str) -> String {
    format!("{MCP_PREFIX}::{name}")
}

/// A registered plugin server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginServer {
    /// Unique name.
    pub name: String,
    /// Server endpoint.
    pub endpoint_url: String,
    /// Free-form description.
    pub description: String,
    /// Toolgroup the server is registered as.
    pub toolgroup_id: String,
}

/// Registry of plugin servers, in first-registration order.
#[derive(Debug, Default, Clone)]
pub struct PluginRegistry {
    servers: IndexMap<String, PluginServer>,
}

impl PluginRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin server and rebuild the agent.
    ///
    /// An empty `auth_token` means no credential is sent.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] without a live connection,
    /// [`SessionError::Registration`] for a blank name or endpoint, or
    /// [`SessionError::Remote`] if the service rejects the toolgroup. The
    /// registry is unchanged in all three cases.
    pub async fn register<C: RemoteClient + ?Sized>(
        &mut self,
        connection: &mut ConnectionManager<C>,
        name: &str,
        endpoint_url: &str,
        description: &str,
        auth_token: &str,
    ) -> Result<String, SessionError> {
        if !connection.is_connected() {
            return Err(SessionError::NotConnected);
        }
        if name.trim().is_empty() || endpoint_url.trim().is_empty() {
            return Err(SessionError::Registration(
                "plugin name and endpoint URL are required".to_string(),
            ));
        }

        let toolgroup_id = toolgroup_id_for(name);
        let registration = ToolGroupRegistration {
            toolgroup_id: toolgroup_id.clone(),
            provider_id: MCP_PROVIDER_ID.to_string(),
            endpoint_url: endpoint_url.to_string(),
            auth_token: Some(auth_token.to_string()).filter(|t| !t.is_empty()),
        };
        connection
            .timed(connection.client().register_toolgroup(&registration))
            .await?;

        self.servers.insert(
            name.to_string(),
            PluginServer {
                name: name.to_string(),
                endpoint_url: endpoint_url.to_string(),
                description: description.to_string(),
                toolgroup_id: toolgroup_id.clone(),
            },
        );
        info!(plugin = name, toolgroup = %toolgroup_id, "plugin server registered");

        Self::rebuild(connection, name).await;
        Ok(format!("{name} registered"))
    }

    /// Unregister a plugin server and rebuild the agent.
    ///
    /// The local record is dropped once the service accepts the call,
    /// whether or not it was known locally.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] without a live connection, or
    /// [`SessionError::Remote`] if the service call fails.
    pub async fn unregister<C: RemoteClient + ?Sized>(
        &mut self,
        connection: &mut ConnectionManager<C>,
        name: &str,
    ) -> Result<String, SessionError> {
        if !connection.is_connected() {
            return Err(SessionError::NotConnected);
        }

        let toolgroup_id = toolgroup_id_for(name);
        connection
            .timed(connection.client().unregister_toolgroup(&toolgroup_id))
            .await?;

        let known = self.servers.shift_remove(name).is_some();
        info!(plugin = name, known, "plugin server unregistered");

        Self::rebuild(connection, name).await;
        Ok(format!("{name} unregistered"))
    }

    async fn rebuild<C: RemoteClient + ?Sized>(connection: &mut ConnectionManager<C>, name: &str) {
        if let Err(e) = connection.connect().await {
            warn!(
                plugin = name,
                "agent rebuild after plugin change failed, live agent is stale until next connect: {e}"
            );
        }
    }

    /// Get a plugin server by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginServer> {
        self.servers.get(name)
    }

    /// All plugin servers in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<PluginServer> {
        self.servers.values().cloned().collect()
    }

    /// Qualified names (`mcp::<name>`) in registration order.
    #[must_use]
    pub fn qualified_names(&self) -> Vec<String> {
        self.servers.keys().map(|name| toolgroup_id_for(name)).collect()
    }

    /// Number of plugin servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether no plugin servers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
