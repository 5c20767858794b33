//! Tool and plugin server registries.
//!
//! Both survive reconnects: entries leave only by explicit unregister or
//! when the owning orchestrator is dropped.

pub mod plugins;
pub mod tools;

pub use plugins::{PluginRegistry, PluginServer, toolgroup_id_for};
pub use tools::{BUILTIN_TOOLS, CustomTool, ToolHandler, ToolRegistry};
