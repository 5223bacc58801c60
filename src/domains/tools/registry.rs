//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A name → tool mapping, filled once at startup
//! - Dispatch of tool calls by name (used by the HTTP transport)
//! - Tool metadata for listing
//!
//! The rmcp binding lives in `router.rs`.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use tracing::{info, warn};

use super::error::ToolError;
use super::handlers::{ToolHandler, ToolOutput};

/// Outcome of [`ToolRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The name was new.
    Added,
    /// A tool with the same name was replaced.
    Replaced,
    /// The tool was not registered.
    Rejected,
}

/// Tool registry - owns every tool by name.
///
/// Listing order is by name; lookups do not depend on insertion order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its name.
    pub fn register(&mut self, tool: impl ToolHandler + 'static) -> Registration {
        self.register_shared(Arc::new(tool))
    }

    /// Register an already shared tool under its name.
    ///
    /// A tool with a blank name is rejected. Registering a name twice keeps
    /// the newer tool and logs a warning.
    pub fn register_shared(&mut self, tool: Arc<dyn ToolHandler>) -> Registration {
        let name = tool.name().trim().to_string();
        let summary = tool.summary().to_string();
        if name.is_empty() {
            warn!("Attempted to register invalid tool with an empty name");
            return Registration::Rejected;
        }

        let outcome = match self.tools.insert(name.clone(), tool) {
            Some(_) => {
                warn!("Tool '{}' is already registered, overwriting", name);
                Registration::Replaced
            }
            None => Registration::Added,
        };

        info!("Registered tool '{}': {}", name, summary);
        outcome
    }

    /// Get a tool by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all registered tools.
    pub fn list_all(&self) -> Vec<Arc<dyn ToolHandler>> {
        self.tools.values().cloned().collect()
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Get all tools as Tool models (metadata).
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.values().map(|tool| tool.to_tool()).collect()
    }

    /// Dispatch a tool call by name.
    ///
    /// Fails only for an unknown name or undecodable arguments; any failure
    /// of the tool itself is inside the returned envelope.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<ToolOutput, ToolError> {
        let Some(tool) = self.lookup(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        tool.call(arguments).await
    }
}
