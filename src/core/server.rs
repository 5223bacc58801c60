//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the editor connection and the tool registry. The rmcp
//! `ToolRouter` and the HTTP transport both dispatch through the same
//! registry, so a tool behaves identically on every transport.
//!
//! Lifecycle: [`McpServer::startup_check`] checks the editor once (a
//! missing editor is not fatal), [`McpServer::shutdown`] releases the
//! connection.

use std::sync::Arc;

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::connection::UnrealConnection;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router, register_editor_tools};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Connection to the Unreal Editor, shared with every tool.
    connection: Arc<UnrealConnection>,

    /// Registered tools, used for HTTP dispatch.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// No request is sent to the editor here.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let connection = Arc::new(UnrealConnection::from_config(&config.unreal));
        let registry = register_editor_tools(connection.clone());

        Self {
            tool_router: build_tool_router::<Self>(&registry),
            registry: Arc::new(registry),
            connection,
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the editor connection.
    pub fn connection(&self) -> &Arc<UnrealConnection> {
        &self.connection
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Check the editor once at startup.
    ///
    /// Returns the status document when the editor answered. An absent
    /// editor only logs a warning; tools retry on every call.
    #[instrument(skip(self))]
    pub async fn startup_check(&self) -> Option<Value> {
        info!(
            "Checking Unreal Editor at {}",
            self.connection.base_url()
        );

        match self.connection.check_status().await {
            Some(status) => {
                info!(
                    "Connected to Unreal Engine project '{}' (engine {})",
                    status_field(&status, "projectName"),
                    status_field(&status, "engineVersion")
                );
                if let Some(count) = self.editor_command_count().await {
                    info!("Editor exposes {} commands", count);
                }
                Some(status)
            }
            None => {
                warn!("Unreal Editor not reachable yet, will retry per-command");
                None
            }
        }
    }

    /// Number of commands in the editor's catalog (`GET /mcp/tools`).
    ///
    /// The editor answers `{"tools": [...]}`. `None` when it did not answer
    /// or the catalog has another shape.
    pub async fn editor_command_count(&self) -> Option<usize> {
        let catalog = self.connection.list_tools().await?;
        match catalog.get("tools").and_then(Value::as_array) {
            Some(tools) => Some(tools.len()),
            None => {
                debug!("Unrecognized editor catalog: {}", catalog);
                None
            }
        }
    }

    /// Release the editor connection.
    pub fn shutdown(&self) {
        info!("Shutting down {}", self.name());
        self.connection.reset();
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Value> {
        self.registry
            .list_tools()
            .into_iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                    "outputSchema": t.output_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Returns the MCP `CallToolResult` as JSON. `Err` is reserved for an
    /// unknown tool or arguments that do not match its parameters.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => JsonObject::new(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {}",
                    other
                )));
            }
        };

        let output = self.registry.call_tool(name, arguments).await?;
        serde_json::to_value(output.into_call_result())
            .map_err(|e| ToolError::internal(e.to_string()))
    }
}

fn status_field<'a>(status: &'a Value, key: &str) -> &'a str {
    status.get(key).and_then(Value::as_str).unwrap_or("unknown")
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Controls a running Unreal Editor. Use `ping` to check the connection, \
                 `get_actors_in_level` to inspect the open level and `execute_python` \
                 to run editor Python scripts."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
