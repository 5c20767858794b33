//! `RemoteClient` over the model service REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use toolstack_core::{
    AgentConfig, AgentId, Model, RemoteClient, RemoteError, ServiceConfig, SessionId, ToolGroup,
    ToolGroupRegistration, TurnRequest, TurnResponse,
};
use tracing::debug;

use crate::wire::{
    CreateAgentBody, CreateAgentResponse, CreateSessionBody, CreateSessionResponse,
    CreateTurnBody, ModelList, RegisterToolGroupBody, ToolGroupList, TurnBody,
};

const API_VERSION: &str = "v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ERROR_BODY_LIMIT: usize = 200;

/// Client construction error.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Model service client speaking HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    base_url: Url,
    api_key: Option<String>,
    timeout: Duration,
    http: reqwest::Client,
}

impl HttpRemoteClient {
    /// Create a client for the configured endpoint.
    ///
    /// # Errors
    /// Returns error if the base URL cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientBuildError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ClientBuildError::InvalidUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url,
            api_key: config.api_key.clone(),
            timeout: config.request_timeout,
            http,
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::Network(format!("cannot extend {}", self.base_url)))?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(segments);
        Ok(url)
    }

    /// Build a request carrying the service API key.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RemoteError> {
        let builder = self.bare_request(method, segments)?;
        Ok(match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        })
    }

    fn bare_request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RemoteError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "model service request");
        Ok(self.http.request(method, url))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, RemoteError> {
        let response = builder.send().await.map_err(|e| self.map_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = text.chars().take(ERROR_BODY_LIMIT).collect::<String>();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, RemoteError> {
        self.send(builder)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    fn map_transport(&self, err: &reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Timeout(self.timeout)
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn list_models(&self) -> Result<Vec<Model>, RemoteError> {
        let list: ModelList = self.send_json(self.request(Method::GET, &["models"])?).await?;
        Ok(list.data)
    }

    async fn list_toolgroups(&self) -> Result<Vec<ToolGroup>, RemoteError> {
        let list: ToolGroupList = self
            .send_json(self.request(Method::GET, &["toolgroups"])?)
            .await?;
        Ok(list.data)
    }

    async fn register_toolgroup(
        &self,
        registration: &ToolGroupRegistration,
    ) -> Result<(), RemoteError> {
        let body = RegisterToolGroupBody {
            toolgroup_id: &registration.toolgroup_id,
            provider_id: &registration.provider_id,
            mcp_endpoint: crate::wire::Url {
                uri: registration.endpoint_url.clone(),
            },
        };

        // The plugin credential replaces the service key on this request.
        let builder = match &registration.auth_token {
            Some(token) => self
                .bare_request(Method::POST, &["toolgroups"])?
                .bearer_auth(token),
            None => self.request(Method::POST, &["toolgroups"])?,
        };

        self.send(builder.json(&body)).await?;
        Ok(())
    }

    async fn unregister_toolgroup(&self, toolgroup_id: &str) -> Result<(), RemoteError> {
        self.send(self.request(Method::DELETE, &["toolgroups", toolgroup_id])?)
            .await?;
        Ok(())
    }

    async fn create_agent(&self, config: &AgentConfig) -> Result<AgentId, RemoteError> {
        let body = CreateAgentBody {
            agent_config: config,
        };
        let created: CreateAgentResponse = self
            .send_json(self.request(Method::POST, &["agents"])?.json(&body))
            .await?;
        Ok(created.agent_id)
    }

    async fn create_session(
        &self,
        agent_id: &str,
        session_name: &str,
    ) -> Result<SessionId, RemoteError> {
        let body = CreateSessionBody { session_name };
        let created: CreateSessionResponse = self
            .send_json(
                self.request(Method::POST, &["agents", agent_id, "session"])?
                    .json(&body),
            )
            .await?;
        Ok(created.session_id)
    }

    async fn create_turn(&self, request: &TurnRequest) -> Result<TurnResponse, RemoteError> {
        let body = CreateTurnBody {
            messages: &request.messages,
            stream: request.stream,
        };
        let turn: TurnBody = self
            .send_json(
                self.request(
                    Method::POST,
                    &[
                        "agents",
                        request.agent_id.as_str(),
                        "session",
                        request.session_id.as_str(),
                        "turn",
                    ],
                )?
                .json(&body),
            )
            .await?;

        Ok(TurnResponse {
            turn_id: turn.turn_id,
            content: turn.output_message.content.into_text(),
        })
    }
}
