//! Tool calls through rmcp, the way a STDIO host drives the server.
//!
//! The server and an rmcp client talk over an in-memory duplex pipe; the
//! editor is a wiremock server.

use rmcp::model::{CallToolRequestParam, CallToolResult, ErrorCode};
use rmcp::service::{RoleClient, RunningService};
use rmcp::{ServiceError, ServiceExt};
use serde_json::{Value, json};
use unreal_editor_mcp::core::config::UnrealConfig;
use unreal_editor_mcp::{Config, McpServer};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(editor: &MockServer) -> RunningService<RoleClient, ()> {
    let config = Config {
        unreal: UnrealConfig {
            base_url: editor.uri(),
            timeout_secs: 5.0,
        },
        ..Config::default()
    };
    let server = McpServer::new(config);

    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        if let Ok(running) = server.serve(server_io).await {
            let _ = running.waiting().await;
        }
    });

    ().serve(client_io).await.unwrap()
}

fn request(body: Value) -> CallToolRequestParam {
    serde_json::from_value(body).unwrap()
}

async fn call(
    client: &RunningService<RoleClient, ()>,
    body: Value,
) -> Result<CallToolResult, ServiceError> {
    client.call_tool(request(body)).await
}

#[tokio::test]
async fn lists_tools_over_rmcp() {
    let editor = MockServer::start().await;
    let client = connect(&editor).await;

    let tools = client.list_tools(None).await.unwrap().tools;
    let mut names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
    names.sort();
    assert_eq!(names, vec!["execute_python", "get_actors_in_level", "ping"]);

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn missing_arguments_read_as_empty_object() {
    let editor = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp/tool/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"message": "pong"}
        })))
        .expect(1)
        .mount(&editor)
        .await;

    let client = connect(&editor).await;
    let result = call(&client, json!({"name": "ping"})).await.unwrap();

    assert_eq!(result.is_error, Some(false));
    assert_eq!(
        result.structured_content,
        Some(json!({"success": true, "message": "pong"}))
    );

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn editor_failure_is_an_error_result() {
    let editor = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp/tool/execute_python"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&editor)
        .await;

    let client = connect(&editor).await;
    let result = call(
        &client,
        json!({"name": "execute_python", "arguments": {"script_content": "print(1)"}}),
    )
    .await
    .unwrap();

    let envelope = json!({"success": false, "error": "HTTP 500: boom"});
    assert_eq!(result.is_error, Some(true));
    assert_eq!(result.structured_content, Some(envelope.clone()));

    let text = result.content[0].as_text().unwrap().text.clone();
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), envelope);

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn missing_script_content_is_invalid_params() {
    let editor = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp/tool/execute_python"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&editor)
        .await;

    let client = connect(&editor).await;
    let err = call(&client, json!({"name": "execute_python", "arguments": {}}))
        .await
        .unwrap_err();

    match err {
        ServiceError::McpError(error) => {
            assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
            assert!(error.message.contains("script_content"));
        }
        other => panic!("expected an MCP error, got {:?}", other),
    }

    client.cancel().await.unwrap();
}
