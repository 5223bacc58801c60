//! Get actors in level tool definition.
//!
//! Lists every actor in the level currently open in the editor.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::common::{call_unreal_tool, decode_data, null_as_default};
use crate::core::connection::{JsonObject, UnrealConnection};
use crate::domains::tools::{EditorTool, ToolError, ToolOutput};

/// The get actors tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetActorsInLevelParams {}

/// Actors of the current level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetActorsInLevelOutput {
    /// Actor information (name, class, location, rotation, scale).
    #[serde(default, deserialize_with = "null_as_default")]
    pub actors: Vec<Value>,

    /// Number of actors reported by the editor.
    #[serde(default, deserialize_with = "deserialize_count")]
    pub count: u64,
}

/// The editor writes every JSON number as a double, so accept `3.0` for 3.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| serde::de::Error::custom(format!("invalid actor count: {}", n))),
        other => Err(serde::de::Error::custom(format!(
            "invalid actor count: {}",
            other
        ))),
    }
}

/// Get actors tool - lists the actors of the current editor level.
pub struct GetActorsInLevelTool {
    connection: Arc<UnrealConnection>,
}

impl GetActorsInLevelTool {
    pub fn new(connection: Arc<UnrealConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait::async_trait]
impl EditorTool for GetActorsInLevelTool {
    type Params = GetActorsInLevelParams;
    type Output = GetActorsInLevelOutput;

    const NAME: &'static str = "get_actors_in_level";

    const DESCRIPTION: &'static str = "Get all actors in the current editor level.

Returns:
    Dictionary containing:
    - success: Whether the operation succeeded
    - actors: List of actor information (name, class, location, rotation, scale)
    - count: Number of actors returned";

    #[instrument(skip_all)]
    async fn execute(&self, _params: GetActorsInLevelParams) -> Result<ToolOutput, ToolError> {
        let data = call_unreal_tool(&self.connection, Self::NAME, JsonObject::new()).await?;
        let output: GetActorsInLevelOutput = decode_data(data)?;

        // Both values are passed through as reported.
        if output.count != output.actors.len() as u64 {
            warn!(
                "Editor reported count {} but returned {} actors",
                output.count,
                output.actors.len()
            );
        }

        info!("Found {} actors in level", output.actors.len());
        Ok(ToolOutput::success(output))
    }
}
