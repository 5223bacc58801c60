//! Common utilities shared across editor tools.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::instrument;

use crate::core::connection::{JsonObject, UnrealConnection, is_truthy, remote_error};
use crate::domains::tools::ToolError;

/// Call a tool on the Unreal Editor and return its `data` object.
///
/// A `success: false` envelope (from the editor or from the connection
/// itself) becomes [`ToolError::RemoteFailure`] carrying its error text.
/// A missing or non-object `data` is treated as empty.
#[instrument(skip(connection, params))]
pub async fn call_unreal_tool(
    connection: &UnrealConnection,
    tool_name: &str,
    params: JsonObject,
) -> Result<JsonObject, ToolError> {
    let mut response = connection.call_tool(tool_name, Some(params)).await;

    if !is_truthy(response.get("success")) {
        return Err(ToolError::remote(remote_error(&response)));
    }

    match response.remove("data") {
        Some(Value::Object(data)) => Ok(data),
        _ => Ok(JsonObject::new()),
    }
}

/// Decode a `data` object into a tool's typed view of it.
pub fn decode_data<T: DeserializeOwned>(data: JsonObject) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(data))
        .map_err(|e| ToolError::unexpected_data(e.to_string()))
}

/// Deserialize a field, reading `null` as the type's default.
///
/// The editor sends `null` for values it could not fill in.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_as_default")]
        count: u64,
    }

    async fn mock_tool(server: &MockServer, body: Value) {
        Mock::given(method("POST"))
            .and(path("/mcp/tool/sample"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_returns_data() {
        let server = MockServer::start().await;
        mock_tool(&server, json!({"success": true, "data": {"count": 3}})).await;

        let conn = UnrealConnection::new(server.uri(), Duration::from_secs(5));
        let data = call_unreal_tool(&conn, "sample", JsonObject::new()).await.unwrap();
        assert_eq!(data["count"], json!(3));
    }

    #[tokio::test]
    async fn test_missing_data_is_empty() {
        let server = MockServer::start().await;
        mock_tool(&server, json!({"success": true})).await;

        let conn = UnrealConnection::new(server.uri(), Duration::from_secs(5));
        let data = call_unreal_tool(&conn, "sample", JsonObject::new()).await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure() {
        let server = MockServer::start().await;
        mock_tool(&server, json!({"success": false})).await;

        let conn = UnrealConnection::new(server.uri(), Duration::from_secs(5));
        let err = call_unreal_tool(&conn, "sample", JsonObject::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown error");
    }

    #[test]
    fn test_decode_data() {
        let sample: Sample = decode_data(JsonObject::new()).unwrap();
        assert_eq!(sample.count, 0);

        let data = json!({"count": null}).as_object().cloned().unwrap();
        let sample: Sample = decode_data(data).unwrap();
        assert_eq!(sample.count, 0);

        let data = json!({"count": "many"}).as_object().cloned().unwrap();
        let err = decode_data::<Sample>(data).unwrap_err();
        assert!(matches!(err, ToolError::UnexpectedData(_)));
    }
}
