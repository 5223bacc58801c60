//! Execute Python tool definition.
//!
//! Sends a Python script to the editor, which saves it under the project's
//! `Content/Python/Scripts` directory and runs it. The script body is relayed
//! as-is; nothing here inspects or restricts it.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::common::{call_unreal_tool, decode_data, null_as_default};
use crate::core::connection::{JsonObject, UnrealConnection};
use crate::domains::tools::{EditorTool, ToolError, ToolOutput};

/// Fallback error when the editor reports a failed run without a message.
const SCRIPT_FAILED: &str = "Python script execution failed";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the execute Python tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecutePythonParams {
    /// The Python script content to execute.
    pub script_content: String,

    /// Optional name for the script (auto-generated if not provided).
    #[serde(default)]
    pub script_name: Option<String>,
}

impl ExecutePythonParams {
    /// Request body sent to the editor. `script_name` is only sent when
    /// non-empty so the editor generates one otherwise.
    fn to_payload(&self) -> JsonObject {
        let mut payload = JsonObject::new();
        payload.insert("script_content".to_string(), json!(self.script_content));
        if let Some(name) = self.script_name.as_deref().filter(|n| !n.is_empty()) {
            payload.insert("script_name".to_string(), json!(name));
        }
        payload
    }
}

// ============================================================================
// Output Structure
// ============================================================================

/// Output of a script run.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ExecutePythonOutput {
    /// The output from the Python script execution.
    pub output: String,

    /// Path where the script was saved.
    pub script_path: String,
}

/// Script report as found in the editor's `data` object.
#[derive(Debug, Default, Deserialize)]
struct ScriptReport {
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    output: String,
    #[serde(default, deserialize_with = "null_as_default")]
    script_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    error: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Execute Python tool - runs a script inside the Unreal Editor.
pub struct ExecutePythonTool {
    connection: Arc<UnrealConnection>,
}

impl ExecutePythonTool {
    pub fn new(connection: Arc<UnrealConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait::async_trait]
impl EditorTool for ExecutePythonTool {
    type Params = ExecutePythonParams;
    type Output = ExecutePythonOutput;

    const NAME: &'static str = "execute_python";

    const DESCRIPTION: &'static str = "Execute a Python script in the Unreal Editor.

Args:
    script_content: The Python script content to execute
    script_name: Optional name for the script (auto-generated if not provided)

Returns:
    Dictionary containing:
    - success: Whether the script executed successfully
    - output: The output from the Python script execution
    - script_path: Path where the script was saved
    - error: Error message if execution failed";

    #[instrument(skip_all, fields(script_name = ?params.script_name))]
    async fn execute(&self, params: ExecutePythonParams) -> Result<ToolOutput, ToolError> {
        info!(
            "Executing Python script ({} bytes)",
            params.script_content.len()
        );

        let data = call_unreal_tool(&self.connection, Self::NAME, params.to_payload()).await?;
        let report: ScriptReport = decode_data(data)?;

        let output = ExecutePythonOutput {
            output: report.output,
            script_path: report.script_path,
        };

        if report.success {
            info!("Script saved to {} ran successfully", output.script_path);
            Ok(ToolOutput::success(output))
        } else {
            let error = if report.error.is_empty() {
                SCRIPT_FAILED.to_string()
            } else {
                report.error
            };
            warn!("Script {} failed: {}", output.script_path, error);
            Ok(ToolOutput::failure_with(error, output))
        }
    }
}
