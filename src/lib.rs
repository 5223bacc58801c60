//! Unreal Editor MCP Server Library
//!
//! Exposes a running Unreal Editor to Model Context Protocol clients. Each
//! MCP tool forwards to the editor plugin's HTTP API and answers with a
//! uniform `{success, ...}` envelope.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the editor connection, the server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the editor tools, their registry and the rmcp binding
//!
//! # Example
//!
//! ```rust,no_run
//! use unreal_editor_mcp::{Config, McpServer};
//! use unreal_editor_mcp::core::TransportService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone());
//!     server.startup_check().await;
//!     TransportService::new(config.transport).run(server.clone()).await?;
//!     server.shutdown();
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result, UnrealConnection};
pub use domains::tools::{ToolOutput, ToolRegistry, register_editor_tools};
