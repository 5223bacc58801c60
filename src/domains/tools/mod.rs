//! Tools domain module.
//!
//! Tools are the operations an MCP client can invoke. Each one forwards to
//! the Unreal Editor HTTP API and answers with a `{success, ...}` envelope.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `EditorTool` trait, its object-safe adapter and the envelope
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `router.rs` - rmcp `ToolRouter` built from the registry
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `spawn_actor.rs`)
//! 2. Declare params and output types and implement `EditorTool`
//! 3. Export it in `definitions/mod.rs` and add it to `register_editor_tools`
//!
//! Both the rmcp router and the HTTP transport pick it up from the registry.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use definitions::register_editor_tools;
pub use error::ToolError;
pub use handlers::{EditorTool, ToolHandler, ToolOutput};
pub use registry::{Registration, ToolRegistry};
pub use router::build_tool_router;
