//! Connection error types.

use thiserror::Error;

/// Errors raised while talking to the Unreal Editor HTTP API.
///
/// These never leave [`UnrealConnection`](super::UnrealConnection): the
/// public operations turn them into an absent value or a failure envelope.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The HTTP client could not be created.
    #[error("Failed to get Unreal connection: {0}")]
    Unavailable(String),

    /// The request could not be sent or the response could not be read
    /// (connection refused, timeout, broken body).
    #[error("{}", describe(.0))]
    Transport(#[from] reqwest::Error),

    /// The editor answered with an empty body.
    #[error("No response from Unreal Engine")]
    NoResponse,

    /// The editor answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body could not be interpreted.
    #[error("{0}")]
    Unexpected(String),
}

impl ConnectionError {
    /// Create an "unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an "unexpected" error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }
}

/// Render an error together with its source chain.
///
/// reqwest only prints the outermost layer ("error sending request for url"),
/// the actual cause (refused, timed out) lives in the sources.
pub(crate) fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
