//! In-memory model service used by the session tests.

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use toolstack_core::{
    AgentConfig, AgentId, Model, RemoteClient, RemoteError, SessionId, ToolGroup,
    ToolGroupRegistration, TurnRequest, TurnResponse,
};

#[derive(Default)]
struct State {
    models: Vec<Model>,
    toolgroups: Vec<ToolGroup>,
    registrations: Vec<ToolGroupRegistration>,
    agents: Vec<AgentConfig>,
    turns: Vec<TurnRequest>,
    sessions_created: usize,
    unreachable: bool,
    fail_toolgroup_listing: bool,
    fail_registration: bool,
    fail_agent_creation: bool,
    fail_turns: bool,
    model_delay: Option<Duration>,
}

/// Fake model service with switchable failures.
#[derive(Default)]
pub struct FakeService {
    state: Mutex<State>,
}

impl FakeService {
    /// A reachable service offering one model and one builtin toolgroup.
    pub fn with_model(model: &str) -> Self {
        let service = Self::default();
        {
            let mut state = service.state.lock().unwrap();
            state.models.push(Model {
                identifier: model.to_string(),
                provider_id: Some("ollama".to_string()),
                model_type: Some("llm".to_string()),
            });
            state.toolgroups.push(ToolGroup {
                identifier: "builtin::websearch".to_string(),
                provider_id: "tavily-search".to_string(),
            });
        }
        service
    }

    pub fn set_unreachable(&self, value: bool) {
        self.state.lock().unwrap().unreachable = value;
    }

    pub fn set_fail_toolgroup_listing(&self, value: bool) {
        self.state.lock().unwrap().fail_toolgroup_listing = value;
    }

    pub fn set_fail_registration(&self, value: bool) {
        self.state.lock().unwrap().fail_registration = value;
    }

    pub fn set_fail_agent_creation(&self, value: bool) {
        self.state.lock().unwrap().fail_agent_creation = value;
    }

    pub fn set_fail_turns(&self, value: bool) {
        self.state.lock().unwrap().fail_turns = value;
    }

    pub fn set_model_delay(&self, delay: Duration) {
        self.state.lock().unwrap().model_delay = Some(delay);
    }

    /// Configurations of every agent created so far.
    pub fn agents(&self) -> Vec<AgentConfig> {
        self.state.lock().unwrap().agents.clone()
    }

    pub fn registrations(&self) -> Vec<ToolGroupRegistration> {
        self.state.lock().unwrap().registrations.clone()
    }

    pub fn turns(&self) -> Vec<TurnRequest> {
        self.state.lock().unwrap().turns.clone()
    }

    fn check_reachable(&self) -> Result<(), RemoteError> {
        if self.state.lock().unwrap().unreachable {
            return Err(RemoteError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteClient for FakeService {
    async fn list_models(&self) -> Result<Vec<Model>, RemoteError> {
        self.check_reachable()?;
        let delay = self.state.lock().unwrap().model_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.state.lock().unwrap().models.clone())
    }

    async fn list_toolgroups(&self) -> Result<Vec<ToolGroup>, RemoteError> {
        self.check_reachable()?;
        let state = self.state.lock().unwrap();
        if state.fail_toolgroup_listing {
            return Err(RemoteError::Api {
                status: 500,
                message: "toolgroup listing failed".to_string(),
            });
        }
        Ok(state.toolgroups.clone())
    }

    async fn register_toolgroup(
        &self,
        registration: &ToolGroupRegistration,
    ) -> Result<(), RemoteError> {
        self.check_reachable()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_registration {
            return Err(RemoteError::Api {
                status: 400,
                message: "endpoint rejected".to_string(),
            });
        }
        state.registrations.push(registration.clone());
        state
            .toolgroups
            .retain(|g| g.identifier != registration.toolgroup_id);
        state.toolgroups.push(ToolGroup {
            identifier: registration.toolgroup_id.clone(),
            provider_id: registration.provider_id.clone(),
        });
        Ok(())
    }

    async fn unregister_toolgroup(&self, toolgroup_id: &str) -> Result<(), RemoteError> {
        self.check_reachable()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_registration {
            return Err(RemoteError::Api {
                status: 404,
                message: format!("{toolgroup_id} not found"),
            });
        }
        state.toolgroups.retain(|g| g.identifier != toolgroup_id);
        Ok(())
    }

    async fn create_agent(&self, config: &AgentConfig) -> Result<AgentId, RemoteError> {
        self.check_reachable()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_agent_creation {
            return Err(RemoteError::Api {
                status: 500,
                message: "agent creation failed".to_string(),
            });
        }
        state.agents.push(config.clone());
        Ok(format!("agent-{}", state.agents.len()))
    }

    async fn create_session(
        &self,
        agent_id: &str,
        _session_name: &str,
    ) -> Result<SessionId, RemoteError> {
        self.check_reachable()?;
        let mut state = self.state.lock().unwrap();
        state.sessions_created += 1;
        Ok(format!("{agent_id}/session-{}", state.sessions_created))
    }

    async fn create_turn(&self, request: &TurnRequest) -> Result<TurnResponse, RemoteError> {
        self.check_reachable()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_turns {
            return Err(RemoteError::Api {
                status: 500,
                message: "inference failed".to_string(),
            });
        }
        state.turns.push(request.clone());
        let content = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(TurnResponse {
            turn_id: Some(format!("turn-{}", state.turns.len())),
            content: format!("echo: {content}"),
        })
    }
}
