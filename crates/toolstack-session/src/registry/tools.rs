//! Locally authored custom tools.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use tracing::info;

/// Built-in tools, always listed first and in this order.
pub const BUILTIN_TOOLS: [&str; 3] = [
    "builtin::code_interpreter",
    "builtin::websearch",
    "builtin::wolfram_alpha",
];

const CUSTOM_PREFIX: &str = "custom";

/// Message returned by a tool registration.
pub const TOOL_REGISTERED: &str = "Tool registered";

/// Callable bound to a custom tool.
pub type ToolHandler = Arc<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// A custom tool record.
///
/// Bookkeeping only: the registry never binds a handler, so `handler`
/// stays `None` and the tool cannot be executed.
#[derive(Clone)]
pub struct CustomTool {
    /// Unique name.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// Tool source as authored.
    pub source: String,
    /// Execution slot, reserved.
    pub handler: Option<ToolHandler>,
}

impl CustomTool {
    /// Qualified name (`custom::<name>`).
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{CUSTOM_PREFIX}::{}", self.name)
    }
}

impl fmt::Debug for CustomTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("source", &self.source)
            .field("handler", &self.handler.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Registry of custom tools, in first-registration order.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: IndexMap<String, CustomTool>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, silently replacing any tool of the same name.
    ///
    /// Any name is accepted, including an empty one.
    pub fn register(&mut self, name: &str, description: &str, source: &str) -> String {
        let tool = CustomTool {
            name: name.to_string(),
            description: description.to_string(),
            source: source.to_string(),
            handler: None,
        };
        let replaced = self.tools.insert(name.to_string(), tool).is_some();
        info!(tool = name, replaced, "custom tool registered");

        TOOL_REGISTERED.to_string()
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CustomTool> {
        self.tools.get(name)
    }

    /// All custom tools.
    pub fn iter(&self) -> impl Iterator<Item = &CustomTool> {
        self.tools.values()
    }

    /// Number of custom tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no custom tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Built-ins followed by `custom::<name>` for every registered tool.
    #[must_use]
    pub fn list_tools(&self) -> Vec<String> {
        BUILTIN_TOOLS
            .iter()
            .map(|name| (*name).to_string())
            .chain(self.tools.values().map(CustomTool::qualified_name))
            .collect()
    }
}
