//! Wire protocol for client-server communication.

use serde::{Deserialize, Serialize};
use toolstack_core::ToolGroup;
use toolstack_session::{Outcome, PluginServer};

/// Message from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Connect, or rebuild the agent if already connected.
    Connect,
    /// Report connection status.
    Status,
    /// Send a chat message.
    Chat { message: String },
    /// List available tool names.
    ListTools,
    /// List registered plugin servers.
    ListPlugins,
    /// List toolgroups registered on the service.
    ListToolgroups,
    /// Register a custom tool.
    RegisterTool {
        name: String,
        description: String,
        source: String,
    },
    /// Register a plugin server.
    RegisterPlugin {
        name: String,
        endpoint_url: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        auth_token: String,
    },
    /// Unregister a plugin server.
    UnregisterPlugin { name: String },
    /// Ping for keepalive.
    Ping,
}

/// Message from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Result of a connect or registry mutation.
    Outcome { ok: bool, message: String },
    /// Connection status.
    Status {
        connected: bool,
        model_id: Option<String>,
    },
    /// Agent reply, or a descriptive failure in its place.
    Reply { content: String },
    /// Available tool names.
    Tools { names: Vec<String> },
    /// Registered plugin servers.
    Plugins { plugins: Vec<PluginServer> },
    /// Toolgroups registered on the service.
    Toolgroups { toolgroups: Vec<ToolGroup> },
    /// Error message.
    Error { message: String },
    /// Pong response.
    Pong,
}

impl From<Outcome> for ServerMessage {
    fn from(outcome: Outcome) -> Self {
        Self::Outcome {
            ok: outcome.ok,
            message: outcome.message,
        }
    }
}
