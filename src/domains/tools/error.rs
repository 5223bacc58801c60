//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur during tool operations.
///
/// Inside [`EditorTool::execute`](super::EditorTool::execute) these are
/// plain `Result` errors; the registry turns every one of them into a
/// failure envelope before it reaches the host.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The editor reported a failure, or the call never reached it.
    #[error("{0}")]
    RemoteFailure(String),

    /// The editor answered, but its `data` did not have the expected shape.
    #[error("Unexpected data from Unreal Engine: {0}")]
    UnexpectedData(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "remote failure" error.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteFailure(msg.into())
    }

    /// Create a new "unexpected data" error.
    pub fn unexpected_data(msg: impl Into<String>) -> Self {
        Self::UnexpectedData(msg.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
