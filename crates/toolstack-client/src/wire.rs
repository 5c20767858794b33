//! Request and response bodies of the model service REST API.

use serde::{Deserialize, Serialize};
use toolstack_core::{AgentConfig, Model, ToolGroup, TurnMessage};

/// Paged list envelope (`{"data": [...]}`).
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}

pub type ModelList = ListResponse<Model>;
pub type ToolGroupList = ListResponse<ToolGroup>;

/// Endpoint reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Url {
    pub uri: String,
}

/// `POST /v1/toolgroups` body.
#[derive(Debug, Serialize)]
pub struct RegisterToolGroupBody<'a> {
    pub toolgroup_id: &'a str,
    pub provider_id: &'a str,
    pub mcp_endpoint: Url,
}

/// `POST /v1/agents` body.
#[derive(Debug, Serialize)]
pub struct CreateAgentBody<'a> {
    pub agent_config: &'a AgentConfig,
}

#[derive(Debug, Deserialize)]
pub struct CreateAgentResponse {
    pub agent_id: String,
}

/// `POST /v1/agents/{agent_id}/session` body.
#[derive(Debug, Serialize)]
pub struct CreateSessionBody<'a> {
    pub session_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// `POST /v1/agents/{agent_id}/session/{session_id}/turn` body.
#[derive(Debug, Serialize)]
pub struct CreateTurnBody<'a> {
    pub messages: &'a [TurnMessage],
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct TurnBody {
    #[serde(default)]
    pub turn_id: Option<String>,
    pub output_message: OutputMessage,
}

#[derive(Debug, Deserialize)]
pub struct OutputMessage {
    pub content: MessageContent,
}

/// Message content: either plain text or a list of typed items.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessageContent {
    /// Flatten to text, concatenating text items and skipping the rest.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Items(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    ContentItem::Text { text } => Some(text),
                    ContentItem::Other => None,
                })
                .collect(),
        }
    }
}
