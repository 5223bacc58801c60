//! Tool definitions module.
//!
//! Each tool is defined in its own file. To add a tool, implement
//! [`EditorTool`](super::EditorTool) for it and register it in
//! [`register_editor_tools`].

pub mod common;
pub mod execute_python;
pub mod get_actors;
pub mod ping;

use std::sync::Arc;

use tracing::info;

use super::ToolRegistry;
use crate::core::connection::UnrealConnection;

pub use execute_python::{ExecutePythonOutput, ExecutePythonParams, ExecutePythonTool};
pub use get_actors::{GetActorsInLevelOutput, GetActorsInLevelParams, GetActorsInLevelTool};
pub use ping::{PingOutput, PingParams, PingTool};

/// Build the registry holding every editor tool.
pub fn register_editor_tools(connection: Arc<UnrealConnection>) -> ToolRegistry {
    info!("Registering editor tools");

    let mut registry = ToolRegistry::new();
    registry.register(PingTool::new(connection.clone()));
    registry.register(GetActorsInLevelTool::new(connection.clone()));
    registry.register(ExecutePythonTool::new(connection));

    info!("Registered {} editor tools", registry.count());
    registry
}
