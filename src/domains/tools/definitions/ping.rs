//! Ping tool definition.
//!
//! Checks that the Unreal Editor plugin is reachable.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};

use super::common::{call_unreal_tool, decode_data};
use crate::core::connection::{JsonObject, UnrealConnection};
use crate::domains::tools::{EditorTool, ToolError, ToolOutput};

/// The ping tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PingParams {}

/// Result of a successful ping.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PingOutput {
    /// Response message from Unreal Engine ("pong").
    #[serde(default = "default_message", deserialize_with = "deserialize_message")]
    pub message: String,
}

fn default_message() -> String {
    "pong".to_string()
}

fn deserialize_message<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_message))
}

/// Ping tool - verifies the connection to the editor.
pub struct PingTool {
    connection: Arc<UnrealConnection>,
}

impl PingTool {
    pub fn new(connection: Arc<UnrealConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait::async_trait]
impl EditorTool for PingTool {
    type Params = PingParams;
    type Output = PingOutput;

    const NAME: &'static str = "ping";

    const DESCRIPTION: &'static str = "Ping the Unreal Engine to check connection.

Returns:
    Dictionary containing:
    - success: Whether the ping succeeded
    - message: Response message from Unreal Engine";

    #[instrument(skip_all)]
    async fn execute(&self, _params: PingParams) -> Result<ToolOutput, ToolError> {
        let data = call_unreal_tool(&self.connection, Self::NAME, JsonObject::new()).await?;
        let output: PingOutput = decode_data(data)?;
        info!("Ping answered: {}", output.message);
        Ok(ToolOutput::success(output))
    }
}
