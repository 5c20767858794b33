//! Connection lifecycle, tool registries and turn dispatch.
//!
//! Provides:
//! - `SessionOrchestrator` - Per-session façade for the presentation layer
//! - `ConnectionManager` - Model/agent/session lifecycle with reconnect
//! - `ToolRegistry`, `PluginRegistry` - Custom tools and plugin servers
//! - `SessionHost` - Many isolated sessions behind per-session locks

pub mod connection;
pub mod error;
pub mod manager;
pub mod orchestrator;
pub mod registry;

#[cfg(test)]
mod testing;

pub use connection::{ConnectionManager, ConnectionState, Discovery, LiveAgent};
pub use error::{Outcome, SessionError};
pub use manager::{HostSessionId, SessionHost, SharedOrchestrator};
pub use orchestrator::SessionOrchestrator;
pub use registry::{BUILTIN_TOOLS, CustomTool, PluginRegistry, PluginServer, ToolRegistry};
