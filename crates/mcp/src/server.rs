//! JSON-RPC 2.0 server over stdio.
//!
//! Reads one request per line from stdin and writes one response per line to
//! stdout. All diagnostics go to stderr via `tracing` so stdout stays a clean
//! protocol channel.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use xcc_client::XcodeCloudClient;

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListResourcesResult, ListToolsResult, ReadResourceParams,
    ResourcesCapability, ServerCapabilities, ServerInfo, ToolsCapability, PROTOCOL_VERSION,
};
use crate::resources::ResourceProvider;
use crate::tools::registry::ToolRegistry;

pub const SERVER_NAME: &str = "Xcode Cloud MCP";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer {
    registry: ToolRegistry,
    resources: ResourceProvider,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, client: Arc<XcodeCloudClient>) -> Self {
        Self {
            registry,
            resources: ResourceProvider::new(client),
        }
    }

    /// Read newline-delimited requests from stdin until EOF.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        debug!(tools = self.registry.len(), "MCP server listening on stdio");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let serialized = serde_json::to_string(&response)?;
                println!("{serialized}");
            }
        }

        debug!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw input line. Returns `None` for notifications, which per
    /// JSON-RPC must not be answered.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "failed to parse request");
                return Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "notification received");
            return None;
        }

        let id = request.id.clone().unwrap_or(serde_json::Value::Null);
        Some(self.dispatch(&request, id).await)
    }

    async fn dispatch(&self, request: &JsonRpcRequest, id: serde_json::Value) -> JsonRpcResponse {
        debug!(method = %request.method, "dispatching request");
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                        resources: ResourcesCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo {
                        name: SERVER_NAME.to_string(),
                        version: SERVER_VERSION.to_string(),
                    },
                },
            ),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => self.call_tool(request, id).await,
            "resources/list" => JsonRpcResponse::success(
                id,
                ListResourcesResult {
                    resources: self.resources.list().await,
                },
            ),
            "resources/read" => self.read_resource(request, id).await,
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        }
    }

    async fn call_tool(&self, request: &JsonRpcRequest, id: serde_json::Value) -> JsonRpcResponse {
        let params: CallToolParams = match request
            .params
            .clone()
            .map(serde_json::from_value)
            .transpose()
        {
            Ok(Some(params)) => params,
            Ok(None) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing params for tools/call"),
                )
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tools/call params: {e}")),
                )
            }
        };

        let Some(tool) = self.registry.get(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
            );
        };

        let arguments = if params.arguments.is_null() {
            serde_json::json!({})
        } else {
            params.arguments
        };

        // Tool failures are surfaced as is_error results so the calling agent
        // can read and react to them. Only infrastructure faults become
        // JSON-RPC errors.
        match tool.execute(arguments).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!(tool = %params.name, error = %e, "tool execution failed");
                JsonRpcResponse::success(
                    id,
                    CallToolResult::error(format!("Error executing {}: {e}", params.name)),
                )
            }
        }
    }

    async fn read_resource(
        &self,
        request: &JsonRpcRequest,
        id: serde_json::Value,
    ) -> JsonRpcResponse {
        let params: ReadResourceParams = match request
            .params
            .clone()
            .map(serde_json::from_value)
            .transpose()
        {
            Ok(Some(params)) => params,
            Ok(None) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing params for resources/read"),
                )
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid resources/read params: {e}")),
                )
            }
        };

        match self.resources.read(&params.uri).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!(uri = %params.uri, error = %e, "resource read failed");
                JsonRpcResponse::error(
                    id,
                    JsonRpcError::internal_error(format!(
                        "Failed to read resource {}: {e}",
                        params.uri
                    )),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::test_client;
    use crate::tools::build_registry;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_server(base_url: &str) -> McpServer {
        let client = test_client(base_url);
        McpServer::new(build_registry(client.clone()), client)
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let mock = MockServer::start().await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0.0.0"}}}"#)
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(json["result"]["serverInfo"]["name"], "Xcode Cloud MCP");
        assert_eq!(json["result"]["capabilities"]["resources"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_initialized_notification_gets_no_response() {
        let mock = MockServer::start().await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_list_is_sorted_and_complete() {
        let mock = MockServer::start().await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        let tools = json["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 22);

        let names: Vec<&str> = tools
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"list_products"));
        assert!(names.contains(&"start_build_and_wait"));
        assert!(names.contains(&"create_workflow_with_actions"));
    }

    #[tokio::test]
    async fn test_tools_call_dispatches_to_tool() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ciProducts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "prod-1",
                    "attributes": {"name": "MyApp", "productType": "APP"}
                }]
            })))
            .mount(&mock)
            .await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"list_products","arguments":{}}}"#,
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        let text = json["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("MyApp"));
    }

    #[tokio::test]
    async fn test_tool_failure_is_result_not_rpc_error() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ciProducts"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "errors": [{"title": "Internal error", "detail": "boom"}]
            })))
            .mount(&mock)
            .await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"list_products"}}"#,
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let mock = MockServer::start().await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"no_such_tool"}}"#,
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mock = MockServer::start().await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":6,"method":"prompts/list"}"#)
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_resources_list_enumerates_uris() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ciProducts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "prod-1", "attributes": {"name": "MyApp"}}]
            })))
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/ciProducts/prod-1/workflows"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&mock)
            .await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#)
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(
            json["result"]["resources"][0]["uri"],
            "xcode-cloud://product/prod-1"
        );
        assert_eq!(json["result"]["resources"][0]["mimeType"], "application/json");
    }

    #[tokio::test]
    async fn test_resources_read_resolves_product_uri() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ciProducts/prod-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "id": "prod-1",
                    "attributes": {"name": "MyApp", "productType": "APP"}
                }
            })))
            .mount(&mock)
            .await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":8,"method":"resources/read","params":{"uri":"xcode-cloud://product/prod-1"}}"#,
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        let text = json["result"]["contents"][0]["text"].as_str().unwrap();
        let document: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(document["name"], "MyApp");
        assert_eq!(document["productType"], "APP");
    }

    #[tokio::test]
    async fn test_resources_read_unsupported_uri_is_rpc_error() {
        let mock = MockServer::start().await;
        let server = test_server(&mock.uri());

        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":9,"method":"resources/read","params":{"uri":"xcode-cloud://artifact/a1"}}"#,
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], -32603);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Failed to read resource xcode-cloud://artifact/a1"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let mock = MockServer::start().await;
        let server = test_server(&mock.uri());

        let response = server.handle_line("{not json").await.unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], -32700);
        assert_eq!(json["id"], serde_json::Value::Null);
    }
}
