//! Core abstractions for model service tool orchestration.
//!
//! This crate provides the shared vocabulary:
//! - `RemoteClient` - The injected model service capability
//! - `Model`, `ToolGroup`, `AgentConfig`, `TurnRequest` - Data exchanged with it
//! - `RemoteError` - Failures raised by the capability
//! - `ServiceConfig` - Endpoint, credentials and request policy

pub mod config;
pub mod traits;

pub use config::{ConfigError, ServiceConfig};
pub use traits::{
    AgentConfig, AgentId, MCP_PROVIDER_ID, Model, ModelId, RemoteClient, RemoteError, SessionId, ToolGroup,
    ToolGroupRegistration, TurnMessage, TurnRequest, TurnResponse,
};
