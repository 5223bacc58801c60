//! Connection to the Unreal Editor HTTP API.
//!
//! [`UnrealConnection`] is the single point of contact with the editor
//! plugin. It owns one reusable HTTP client that is created lazily on the
//! first request and dropped on [`UnrealConnection::reset`]:
//!
//! ```text
//! Disconnected --(first request)--> Connected --(reset)--> Disconnected
//! ```
//!
//! A failed request does not change the state. No operation here returns an
//! error: status and catalog lookups yield `None` on failure, tool calls
//! always yield an envelope map.

mod error;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::{debug, error, info, instrument};

use super::config::UnrealConfig;

pub use error::ConnectionError;

/// JSON object as exchanged with the editor.
pub type JsonObject = Map<String, Value>;

/// Fallback text when a failed envelope carries no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// HTTP connection to one Unreal Editor instance.
///
/// Shared behind an `Arc` by the server, the tools and the transports.
/// The client slot is guarded so lazy creation and reset are safe under
/// concurrent tool calls; the lock is never held across a request.
#[derive(Debug)]
pub struct UnrealConnection {
    base_url: String,
    timeout: Duration,
    client: Mutex<Option<reqwest::Client>>,
    handles_created: AtomicUsize,
}

impl UnrealConnection {
    /// Create a disconnected connection to `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout,
            client: Mutex::new(None),
            handles_created: AtomicUsize::new(0),
        }
    }

    /// Create a connection from the `unreal` section of the configuration.
    pub fn from_config(config: &UnrealConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout())
    }

    /// Base URL of the editor API, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a live HTTP client currently exists.
    pub fn is_connected(&self) -> bool {
        self.slot().is_some()
    }

    /// Number of HTTP clients created over the lifetime of this connection.
    pub fn handles_created(&self) -> usize {
        self.handles_created.load(Ordering::SeqCst)
    }

    /// Drop the HTTP client. The next request creates a new one.
    pub fn reset(&self) {
        if self.slot().take().is_some() {
            info!("Closed Unreal Editor connection to {}", self.base_url);
        }
    }

    /// Fetch `GET /mcp/status`. Returns `None` on any failure.
    #[instrument(skip(self))]
    pub async fn check_status(&self) -> Option<Value> {
        match self.get_json("/mcp/status").await {
            Ok(status) => Some(status),
            Err(e) => {
                error!("Error checking status: {}", e);
                None
            }
        }
    }

    /// Fetch `GET /mcp/tools`. Returns `None` on any failure.
    #[instrument(skip(self))]
    pub async fn list_tools(&self) -> Option<Value> {
        match self.get_json("/mcp/tools").await {
            Ok(tools) => Some(tools),
            Err(e) => {
                error!("Error listing tools: {}", e);
                None
            }
        }
    }

    /// Call `POST /mcp/tool/{tool_name}` with `params` as the JSON body.
    ///
    /// Returns the editor's envelope verbatim when the request succeeds,
    /// otherwise a `{"success": false, "error": ...}` map describing the
    /// failure.
    #[instrument(skip(self, params))]
    pub async fn call_tool(&self, tool_name: &str, params: Option<JsonObject>) -> JsonObject {
        let payload = params.unwrap_or_default();
        debug!("Calling tool '{}' with params: {:?}", tool_name, payload);

        match self.post_tool(tool_name, &payload).await {
            Ok(result) => {
                debug!("Response from Unreal: {:?}", result);
                if !is_truthy(result.get("success")) {
                    error!("Unreal error: {}", remote_error(&result));
                }
                result
            }
            Err(e) => {
                match &e {
                    ConnectionError::HttpStatus { status, body } => {
                        error!("HTTP error calling tool '{}': {} - {}", tool_name, status, body);
                    }
                    _ => error!("Error calling tool '{}': {}", tool_name, e),
                }
                failure_envelope(e.to_string())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn slot(&self) -> MutexGuard<'_, Option<reqwest::Client>> {
        self.client.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the live client, creating it on first use.
    fn client(&self) -> Result<reqwest::Client, ConnectionError> {
        let mut slot = self.slot();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConnectionError::unavailable(error::describe(&e)))?;
        self.handles_created.fetch_add(1, Ordering::SeqCst);
        debug!("Created HTTP client for {}", self.base_url);

        *slot = Some(client.clone());
        Ok(client)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ConnectionError> {
        let client = self.client()?;
        let response = client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        read_body(response).await
    }

    async fn post_tool(
        &self,
        tool_name: &str,
        payload: &JsonObject,
    ) -> Result<JsonObject, ConnectionError> {
        let client = self.client()?;
        let response = client
            .post(format!("{}/mcp/tool/{}", self.base_url, tool_name))
            .json(payload)
            .send()
            .await?;

        match read_body(response).await? {
            Value::Object(map) => Ok(map),
            other => Err(ConnectionError::unexpected(format!(
                "Unexpected response from Unreal Engine: expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Read a response body, classifying status and parse failures.
async fn read_body(response: reqwest::Response) -> Result<Value, ConnectionError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ConnectionError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Err(ConnectionError::NoResponse);
    }

    serde_json::from_str(&body).map_err(|e| {
        ConnectionError::unexpected(format!("Invalid JSON from Unreal Engine: {}", e))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Build a `{"success": false, "error": ...}` map.
///
/// An empty message is replaced by [`UNKNOWN_ERROR`].
pub fn failure_envelope(message: impl Into<String>) -> JsonObject {
    let mut message = message.into();
    if message.trim().is_empty() {
        message = UNKNOWN_ERROR.to_string();
    }
    let mut map = JsonObject::new();
    map.insert("success".to_string(), json!(false));
    map.insert("error".to_string(), json!(message));
    map
}

/// JSON truthiness of an optional field.
///
/// `null`, `false`, `0`, `""`, `[]`, `{}` and a missing field are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Error text reported by a failed envelope: `error`, else `message`,
/// else [`UNKNOWN_ERROR`]. Empty strings count as missing.
pub fn remote_error(envelope: &JsonObject) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|key| envelope.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connection(base_url: &str) -> UnrealConnection {
        UnrealConnection::new(base_url, Duration::from_secs(5))
    }

    /// Base URL of a port nothing listens on.
    fn unreachable_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let conn = connection("http://localhost:3000///");
        assert_eq!(conn.base_url(), "http://localhost:3000");
        assert_eq!(conn.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_new_is_disconnected() {
        let conn = connection("http://localhost:3000");
        assert!(!conn.is_connected());
        assert_eq!(conn.handles_created(), 0);
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!([]))));
    }

    #[test]
    fn test_remote_error_precedence() {
        let env = json!({"success": false, "error": "bad", "message": "meh"});
        assert_eq!(remote_error(env.as_object().unwrap()), "bad");

        let env = json!({"success": false, "error": "", "message": "meh"});
        assert_eq!(remote_error(env.as_object().unwrap()), "meh");

        let env = json!({"success": false});
        assert_eq!(remote_error(env.as_object().unwrap()), UNKNOWN_ERROR);
    }

    #[test]
    fn test_failure_envelope_never_empty() {
        let env = failure_envelope("");
        assert_eq!(env["success"], json!(false));
        assert_eq!(env["error"], json!(UNKNOWN_ERROR));
    }

    #[tokio::test]
    async fn test_check_status_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mcp/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projectName": "Demo",
                "engineVersion": "5.4"
            })))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let status = conn.check_status().await.unwrap();
        assert_eq!(status["projectName"], "Demo");
        assert!(conn.is_connected());
    }

    #[tokio::test]
    async fn test_check_status_remote_down() {
        let conn = connection(&unreachable_url());
        assert!(conn.check_status().await.is_none());
        // A failed request leaves the handle in place.
        assert!(conn.is_connected());
    }

    #[tokio::test]
    async fn test_list_tools_non_2xx_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mcp/tools"))
            .respond_with(ResponseTemplate::new(503).set_body_string("starting"))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        assert!(conn.list_tools().await.is_none());
    }

    #[tokio::test]
    async fn test_list_tools_malformed_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mcp/tools"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        assert!(conn.list_tools().await.is_none());
    }

    #[tokio::test]
    async fn test_call_tool_success_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/ping"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "ok",
                "data": {"message": "pong"}
            })))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let result = conn.call_tool("ping", None).await;
        assert_eq!(result["success"], json!(true));
        assert_eq!(result["message"], json!("ok"));
        assert_eq!(result["data"]["message"], json!("pong"));
    }

    #[tokio::test]
    async fn test_call_tool_sends_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/execute_python"))
            .and(body_json(json!({"script_content": "print(1)"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let params = json!({"script_content": "print(1)"})
            .as_object()
            .cloned();
        let result = conn.call_tool("execute_python", params).await;
        assert_eq!(result["success"], json!(true));
    }

    #[tokio::test]
    async fn test_call_tool_remote_failure_returned_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/get_actors_in_level"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "No editor world available"
            })))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let result = conn.call_tool("get_actors_in_level", None).await;
        assert_eq!(result["success"], json!(false));
        assert_eq!(result["error"], json!("No editor world available"));
    }

    #[tokio::test]
    async fn test_call_tool_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/execute_python"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let result = conn.call_tool("execute_python", None).await;
        assert_eq!(result["success"], json!(false));
        assert_eq!(result["error"], json!("HTTP 500: boom"));
    }

    #[tokio::test]
    async fn test_call_tool_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let result = conn.call_tool("ping", None).await;
        assert_eq!(result["success"], json!(false));
        let error = result["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid JSON from Unreal Engine"));
    }

    #[tokio::test]
    async fn test_call_tool_non_object_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let result = conn.call_tool("ping", None).await;
        assert_eq!(result["success"], json!(false));
        assert!(result["error"].as_str().unwrap().contains("an array"));
    }

    #[tokio::test]
    async fn test_call_tool_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/ping"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        let result = conn.call_tool("ping", None).await;
        assert_eq!(result["error"], json!("No response from Unreal Engine"));
    }

    #[tokio::test]
    async fn test_call_tool_unreachable() {
        let conn = connection(&unreachable_url());
        let result = conn.call_tool("ping", None).await;
        assert_eq!(result["success"], json!(false));
        assert!(!result["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_call_tool_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/tool/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let conn = UnrealConnection::new(server.uri(), Duration::from_millis(50));
        let result = conn.call_tool("ping", None).await;
        assert_eq!(result["success"], json!(false));
        assert!(!result["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_reused_until_reset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mcp/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let conn = connection(&server.uri());
        conn.check_status().await;
        conn.check_status().await;
        assert_eq!(conn.handles_created(), 1);

        conn.reset();
        assert!(!conn.is_connected());
        assert_eq!(conn.handles_created(), 1);

        conn.check_status().await;
        assert!(conn.is_connected());
        assert_eq!(conn.handles_created(), 2);
    }
}
