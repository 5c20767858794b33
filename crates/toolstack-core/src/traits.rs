//! The model service capability and the data it exchanges.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of an inference model.
pub type ModelId = String;

/// Handle to a server-side agent instance.
pub type AgentId = String;

/// Identifier of a conversation session under an agent.
pub type SessionId = String;

/// Provider tag used for plugin server toolgroups.
pub const MCP_PROVIDER_ID: &str = "model-context-protocol";

/// A model advertised by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model identifier, passed back when creating agents.
    pub identifier: ModelId,
    /// Provider serving the model.
    #[serde(default)]
    pub provider_id: Option<String>,
    /// Kind of model (`llm`, `embedding`, ...).
    #[serde(default)]
    pub model_type: Option<String>,
}

/// A toolgroup registered on the service.
///
/// Remote-owned; callers get a fresh copy per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolGroup {
    /// Toolgroup identifier (`builtin::websearch`, `mcp::weather`, ...).
    pub identifier: String,
    /// Provider backing the toolgroup.
    pub provider_id: String,
}

/// Request to register a toolgroup backed by a plugin server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolGroupRegistration {
    /// Toolgroup identifier to register.
    pub toolgroup_id: String,
    /// Provider tag.
    pub provider_id: String,
    /// Endpoint of the plugin server.
    pub endpoint_url: String,
    /// Bearer credential for the plugin server, if any.
    pub auth_token: Option<String>,
}

/// Configuration used when creating an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model backing the agent.
    pub model: ModelId,
    /// Fixed instruction prompt.
    pub instructions: String,
    /// Toolgroups visible to the agent. Snapshot taken at creation.
    pub toolgroups: Vec<String>,
}

/// A single message in a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMessage {
    /// Message role.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl TurnMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A turn submitted against an agent session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    /// Agent the session belongs to.
    pub agent_id: AgentId,
    /// Session to submit into.
    pub session_id: SessionId,
    /// Messages making up the turn.
    pub messages: Vec<TurnMessage>,
    /// Whether to stream the reply.
    pub stream: bool,
}

/// The agent's reply to a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Turn identifier, when the service reports one.
    #[serde(default)]
    pub turn_id: Option<String>,
    /// Textual reply.
    pub content: String,
}

/// Error raised by a remote call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Capability for talking to the model service.
///
/// Implement this trait to plug in a transport; the orchestration
/// layer only ever sees this surface.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// List available models.
    async fn list_models(&self) -> Result<Vec<Model>, RemoteError>;

    /// List registered toolgroups.
    async fn list_toolgroups(&self) -> Result<Vec<ToolGroup>, RemoteError>;

    /// Register a plugin server as a toolgroup.
    async fn register_toolgroup(
        &self,
        registration: &ToolGroupRegistration,
    ) -> Result<(), RemoteError>;

    /// Unregister a toolgroup.
    async fn unregister_toolgroup(&self, toolgroup_id: &str) -> Result<(), RemoteError>;

    /// Create an agent.
    async fn create_agent(&self, config: &AgentConfig) -> Result<AgentId, RemoteError>;

    /// Create a session under an agent.
    async fn create_session(
        &self,
        agent_id: &str,
        session_name: &str,
    ) -> Result<SessionId, RemoteError>;

    /// Submit a turn and wait for the reply.
    async fn create_turn(&self, request: &TurnRequest) -> Result<TurnResponse, RemoteError>;
}
