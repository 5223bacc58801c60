//! Tool abstraction and result envelope.
//!
//! Every tool is an [`EditorTool`]: a name, a description, declared
//! parameter and output types, and an async `execute`. The registry stores
//! tools as [`ToolHandler`] trait objects; the blanket implementation below
//! is the adapter that turns a declared tool into something a host protocol
//! can list and invoke (schemas, argument decoding, failure conversion).

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Content, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{error, warn};

use super::error::ToolError;
use crate::core::connection::UNKNOWN_ERROR;

// ============================================================================
// Result envelope
// ============================================================================

/// Uniform result of every tool call.
///
/// Serializes as `{"success": true, ...data}` or
/// `{"success": false, "error": "...", ...data}`. A failure always carries
/// a non-empty error; a success never carries one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    success: bool,

    #[serde(flatten)]
    data: JsonObject,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ToolOutput {
    /// Create a successful output from the tool's declared output fields.
    pub fn success(data: impl Serialize) -> Self {
        match to_fields(data) {
            Ok(data) => Self {
                success: true,
                data,
                error: None,
            },
            Err(e) => Self::failure(e),
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: JsonObject::new(),
            error: Some(non_empty(error.into())),
        }
    }

    /// Create a failed output that still carries output fields.
    pub fn failure_with(error: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            data: to_fields(data).unwrap_or_default(),
            ..Self::failure(error)
        }
    }

    /// Whether the call succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Error message, present exactly when the call failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Tool-specific output fields.
    pub fn data(&self) -> &JsonObject {
        &self.data
    }

    /// Get one output field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// The envelope as a JSON value.
    pub fn to_value(&self) -> Value {
        let mut map = JsonObject::new();
        map.insert("success".to_string(), json!(self.success));
        map.extend(self.data.clone());
        if let Some(error) = &self.error {
            map.insert("error".to_string(), json!(error));
        }
        Value::Object(map)
    }

    /// Convert into an MCP tool result.
    ///
    /// The envelope is returned both as structured content and as its JSON
    /// text; `isError` mirrors `success`.
    pub fn into_call_result(self) -> CallToolResult {
        let value = self.to_value();
        CallToolResult {
            content: vec![Content::text(value.to_string())],
            structured_content: Some(value),
            is_error: Some(!self.success),
            meta: None,
        }
    }
}

/// Serialize output fields, dropping the keys the envelope owns.
fn to_fields(data: impl Serialize) -> Result<JsonObject, String> {
    match serde_json::to_value(data) {
        Ok(Value::Object(mut map)) => {
            map.remove("success");
            map.remove("error");
            Ok(map)
        }
        Ok(Value::Null) => Ok(JsonObject::new()),
        Ok(other) => Err(format!("Tool output must be an object, got {}", other)),
        Err(e) => Err(format!("Failed to serialize tool output: {}", e)),
    }
}

fn non_empty(error: String) -> String {
    if error.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        error
    }
}

// ============================================================================
// Tool capability
// ============================================================================

/// A named operation forwarded to the Unreal Editor.
///
/// Parameters and output are declared as types once; the registry derives
/// the host-visible schemas from them.
#[async_trait::async_trait]
pub trait EditorTool: Send + Sync + 'static {
    /// Parameters accepted from the host.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Fields reported on success, in addition to `success`.
    type Output: Serialize + JsonSchema + 'static;

    /// Stable identifier; also the editor endpoint segment.
    const NAME: &'static str;

    /// Documentation shown to clients. The first line is the summary.
    const DESCRIPTION: &'static str;

    /// Run the tool.
    async fn execute(&self, params: Self::Params) -> Result<ToolOutput, ToolError>;
}

/// Object-safe view of a tool, as stored in the registry.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the name of this tool.
    fn name(&self) -> &str;

    /// Get the description of this tool.
    fn description(&self) -> &str;

    /// First line of the description.
    fn summary(&self) -> &str {
        self.description().lines().next().unwrap_or_default().trim()
    }

    /// Host-visible metadata: name, description, input and output schemas.
    fn to_tool(&self) -> Tool;

    /// Decode `arguments` and run the tool.
    ///
    /// Only undecodable arguments produce an `Err`. Every failure after
    /// that, including a panic, becomes a failure envelope.
    async fn call(&self, arguments: JsonObject) -> Result<ToolOutput, ToolError>;
}

#[async_trait::async_trait]
impl<T: EditorTool> ToolHandler for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn description(&self) -> &str {
        T::DESCRIPTION
    }

    fn to_tool(&self) -> Tool {
        Tool {
            name: T::NAME.into(),
            description: Some(T::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<T::Params>(),
            annotations: None,
            output_schema: Some(envelope_schema::<T::Output>()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    async fn call(&self, arguments: JsonObject) -> Result<ToolOutput, ToolError> {
        let params: T::Params = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let output = match AssertUnwindSafe(self.execute(params)).catch_unwind().await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Tool '{}' failed: {}", T::NAME, e);
                ToolOutput::failure(e.to_string())
            }
            Err(panic) => {
                let e = ToolError::internal(format!(
                    "Tool '{}' panicked: {}",
                    T::NAME,
                    panic_message(panic.as_ref())
                ));
                error!("{}", e);
                ToolOutput::failure(e.to_string())
            }
        };

        Ok(output)
    }
}

/// Output schema of a tool: its declared fields plus the envelope's
/// `success` and `error`. Only `success` is required, the declared fields
/// are absent on failure.
fn envelope_schema<O: JsonSchema + 'static>() -> Arc<JsonObject> {
    let mut schema = (*cached_schema_for_type::<O>()).clone();

    let properties = schema
        .entry("properties")
        .or_insert_with(|| Value::Object(JsonObject::new()));
    if let Value::Object(properties) = properties {
        properties.insert(
            "success".to_string(),
            json!({"type": "boolean", "description": "Whether the call succeeded"}),
        );
        properties.entry("error").or_insert_with(|| {
            json!({"type": "string", "description": "Error message, present when success is false"})
        });
    }
    schema.insert("required".to_string(), json!(["success"]));

    Arc::new(schema)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
