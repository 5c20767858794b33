//! Connection lifecycle against the model service.
//!
//! A connection is the triple (model, agent, session) built in one go by
//! [`ConnectionManager::connect`]. The agent's toolgroup list is a snapshot
//! taken at creation, so anything that changes the remote toolgroups must
//! call `connect` again to make them visible.

use std::{future::Future, sync::Arc};

use toolstack_core::{
    AgentConfig, AgentId, ModelId, RemoteClient, RemoteError, ServiceConfig, SessionId, ToolGroup,
    TurnMessage, TurnRequest, TurnResponse,
};
use tracing::{debug, info, warn};

use crate::error::SessionError;

/// The agent and session created by a successful connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveAgent {
    /// Model the agent runs on.
    pub model_id: ModelId,
    /// Server-side agent handle.
    pub agent_id: AgentId,
    /// Conversation session shared by all turns of this connection.
    pub session_id: SessionId,
    /// Toolgroups the agent was created with.
    pub toolgroups: Vec<String>,
}

/// Connection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live agent.
    #[default]
    Disconnected,
    /// Agent and session are live.
    Connected(LiveAgent),
}

/// Outcome of best-effort toolgroup discovery.
///
/// Discovery never blocks a connect: an unavailable listing is treated
/// as "no toolgroups".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// The service answered.
    Listed(Vec<ToolGroup>),
    /// The listing failed or there was nothing to ask.
    Unavailable { reason: String },
}

impl Discovery {
    /// The discovered toolgroups, empty when unavailable.
    #[must_use]
    pub fn into_toolgroups(self) -> Vec<ToolGroup> {
        match self {
            Self::Listed(groups) => groups,
            Self::Unavailable { .. } => Vec::new(),
        }
    }
}

/// Owns the connection state machine.
pub struct ConnectionManager<C: RemoteClient + ?Sized> {
    client: Arc<C>,
    config: ServiceConfig,
    state: ConnectionState,
}

impl<C: RemoteClient + ?Sized> ConnectionManager<C> {
    /// Create a disconnected manager.
    #[must_use]
    pub const fn new(client: Arc<C>, config: ServiceConfig) -> Self {
        Self {
            client,
            config,
            state: ConnectionState::Disconnected,
        }
    }

    /// Whether an agent session is live.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// The live agent, if connected.
    #[must_use]
    pub const fn live(&self) -> Option<&LiveAgent> {
        match &self.state {
            ConnectionState::Connected(live) => Some(live),
            ConnectionState::Disconnected => None,
        }
    }

    /// Configuration the manager was built with.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    /// Run a remote call under the configured request timeout.
    pub(crate) async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> Result<T, RemoteError> {
        let timeout = self.config.request_timeout;
        tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| RemoteError::Timeout(timeout))?
    }

    /// Connect, or rebuild the agent and session if already connected.
    ///
    /// The previous agent and session are dropped first; on failure the
    /// manager is left disconnected.
    ///
    /// # Errors
    /// Returns [`SessionError::Connection`] if the service is unreachable,
    /// offers no models, or refuses to create the agent or session.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        self.state = ConnectionState::Disconnected;

        let live = self.build().await.inspect_err(|e| {
            warn!(url = %self.config.base_url, "connect failed: {e}");
        })?;

        info!(
            model = %live.model_id,
            agent = %live.agent_id,
            session = %live.session_id,
            toolgroups = live.toolgroups.len(),
            "connected to model service"
        );
        self.state = ConnectionState::Connected(live);
        Ok(())
    }

    async fn build(&self) -> Result<LiveAgent, SessionError> {
        let models = self
            .timed(self.client.list_models())
            .await
            .map_err(|e| SessionError::Connection(format!("Failed to list models: {e}")))?;
        let model_id = models
            .into_iter()
            .next()
            .map(|m| m.identifier)
            .ok_or_else(|| {
                SessionError::Connection(format!(
                    "No models available at {}",
                    self.config.base_url
                ))
            })?;

        let toolgroups: Vec<String> = self
            .discover_toolgroups()
            .await
            .into_toolgroups()
            .into_iter()
            .map(|g| g.identifier)
            .collect();

        let agent_config = AgentConfig {
            model: model_id.clone(),
            instructions: self.config.instructions.clone(),
            toolgroups: toolgroups.clone(),
        };
        let agent_id = self
            .timed(self.client.create_agent(&agent_config))
            .await
            .map_err(|e| SessionError::Connection(format!("Failed to create agent: {e}")))?;

        let session_id = self
            .timed(
                self.client
                    .create_session(&agent_id, &self.config.session_name),
            )
            .await
            .map_err(|e| SessionError::Connection(format!("Failed to create session: {e}")))?;

        Ok(LiveAgent {
            model_id,
            agent_id,
            session_id,
            toolgroups,
        })
    }

    /// Best-effort toolgroup listing.
    pub async fn discover_toolgroups(&self) -> Discovery {
        match self.timed(self.client.list_toolgroups()).await {
            Ok(groups) => Discovery::Listed(groups),
            Err(e) => {
                warn!("toolgroup discovery unavailable: {e}");
                Discovery::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Live toolgroup listing; empty when disconnected or on failure.
    pub async fn list_remote_toolgroups(&self) -> Vec<ToolGroup> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.discover_toolgroups().await.into_toolgroups()
    }

    /// Submit a single non-streaming user turn to the live session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] without a live session, or
    /// [`SessionError::Remote`] if the turn fails.
    pub async fn submit_turn(&self, message: &str) -> Result<TurnResponse, SessionError> {
        let live = self.live().ok_or(SessionError::NotConnected)?;
        let request = TurnRequest {
            agent_id: live.agent_id.clone(),
            session_id: live.session_id.clone(),
            messages: vec![TurnMessage::user(message)],
            stream: false,
        };

        debug!(session = %live.session_id, "submitting turn");
        Ok(self.timed(self.client.create_turn(&request)).await?)
    }
}
