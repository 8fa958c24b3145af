//! Build status monitoring tools.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use xcc_client::XcodeCloudClient;

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::json_result;
use crate::tools::registry::{
    json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry,
};
use crate::uri::{parse_build_run_id, parse_workflow_id};

pub fn register(registry: &mut ToolRegistry, client: Arc<XcodeCloudClient>) {
    registry.register(Arc::new(GetBuildRun {
        client: client.clone(),
    }));
    registry.register(Arc::new(ListBuildRuns {
        client: client.clone(),
    }));
    registry.register(Arc::new(GetBuildActions { client }));
}

struct GetBuildRun {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBuildRunArgs {
    build_run_id: String,
}

#[async_trait::async_trait]
impl Tool for GetBuildRun {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_build_run".to_string(),
            description: "Get the current status and details of a specific build run, \
                          including execution progress, completion status, and issue counts."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "buildRunId": json_schema_string(
                        "The build run ID or resource URI (e.g., \"xcode-cloud://build-run/abc123\" or just \"abc123\")",
                    ),
                }),
                vec!["buildRunId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetBuildRunArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting build run: {e}"
                )))
            }
        };

        let build_run_id = parse_build_run_id(&args.build_run_id);
        match self.client.builds().get(build_run_id).await {
            Ok(build) => {
                let attributes = &build.attributes;
                Ok(json_result(json!({
                    "id": build.id,
                    "number": attributes.number,
                    "executionProgress": attributes.execution_progress,
                    "completionStatus": attributes.completion_status,
                    "createdDate": attributes.created_date,
                    "startedDate": attributes.started_date,
                    "finishedDate": attributes.finished_date,
                    "sourceCommit": attributes.source_commit,
                    "destinationCommit": attributes.destination_commit,
                    "isPullRequestBuild": attributes.is_pull_request_build,
                    "issueCounts": attributes.issue_counts,
                    "startReason": attributes.start_reason,
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting build run: {e}"
            ))),
        }
    }
}

struct ListBuildRuns {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListBuildRunsArgs {
    workflow_id: String,
    limit: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListBuildRuns {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_build_runs".to_string(),
            description: "List recent build runs for a specific workflow, ordered by creation \
                          date (newest first)."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workflowId": json_schema_string(
                        "The workflow ID or resource URI (e.g., \"xcode-cloud://workflow/abc123\" or just \"abc123\")",
                    ),
                    "limit": json_schema_number("Maximum number of build runs to return (default: 20)"),
                }),
                vec!["workflowId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ListBuildRunsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error listing build runs: {e}"
                )))
            }
        };

        let workflow_id = parse_workflow_id(&args.workflow_id);
        match self
            .client
            .builds()
            .list_for_workflow(workflow_id, args.limit)
            .await
        {
            Ok(builds) => {
                let formatted: Vec<_> = builds
                    .iter()
                    .map(|run| {
                        json!({
                            "id": run.id,
                            "number": run.attributes.number,
                            "executionProgress": run.attributes.execution_progress,
                            "completionStatus": run.attributes.completion_status,
                            "createdDate": run.attributes.created_date,
                            "finishedDate": run.attributes.finished_date,
                            "issueCounts": run.attributes.issue_counts,
                            "sourceCommit": run.attributes.source_commit,
                        })
                    })
                    .collect();
                Ok(json_result(json!({
                    "buildRuns": formatted,
                    "total": formatted.len(),
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error listing build runs: {e}"
            ))),
        }
    }
}

struct GetBuildActions {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBuildActionsArgs {
    build_run_id: String,
}

#[async_trait::async_trait]
impl Tool for GetBuildActions {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_build_actions".to_string(),
            description: "Get all build actions (compile, test, analyze, archive) for a \
                          specific build run, including their status and issue counts."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "buildRunId": json_schema_string(
                        "The build run ID or resource URI (e.g., \"xcode-cloud://build-run/abc123\" or just \"abc123\")",
                    ),
                }),
                vec!["buildRunId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetBuildActionsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting build actions: {e}"
                )))
            }
        };

        let build_run_id = parse_build_run_id(&args.build_run_id);
        match self.client.builds().actions(build_run_id).await {
            Ok(actions) => {
                let formatted: Vec<_> = actions
                    .iter()
                    .map(|action| {
                        json!({
                            "id": action.id,
                            "name": action.attributes.name,
                            "actionType": action.attributes.action_type,
                            "executionProgress": action.attributes.execution_progress,
                            "completionStatus": action.attributes.completion_status,
                            "startedDate": action.attributes.started_date,
                            "finishedDate": action.attributes.finished_date,
                            "issueCounts": action.attributes.issue_counts,
                        })
                    })
                    .collect();
                Ok(json_result(json!({"actions": formatted})))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting build actions: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{result_text, test_client};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_build_run() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciBuildRuns/build-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "id": "build-1",
                    "attributes": {
                        "number": 12,
                        "executionProgress": "COMPLETE",
                        "completionStatus": "FAILED",
                        "isPullRequestBuild": true,
                        "issueCounts": {
                            "analyzerWarnings": 0,
                            "errors": 2,
                            "testFailures": 0,
                            "warnings": 5
                        },
                        "startReason": "GIT_REF_CHANGE"
                    }
                }
            })))
            .mount(&server)
            .await;

        let tool = GetBuildRun {
            client: test_client(&server.uri()),
        };
        let result = tool.execute(json!({"buildRunId": "build-1"})).await.unwrap();

        let payload: serde_json::Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["completionStatus"], "FAILED");
        assert_eq!(payload["issueCounts"]["errors"], 2);
        assert_eq!(payload["isPullRequestBuild"], true);
    }

    #[tokio::test]
    async fn test_list_build_runs_passes_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciWorkflows/wf-1/buildRuns"))
            .and(query_param("limit", "5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        let tool = ListBuildRuns {
            client: test_client(&server.uri()),
        };
        let result = tool
            .execute(json!({"workflowId": "wf-1", "limit": 5}))
            .await
            .unwrap();

        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_get_build_actions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciBuildRuns/build-1/actions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "action-1",
                    "attributes": {
                        "name": "Archive - iOS",
                        "actionType": "ARCHIVE",
                        "executionProgress": "COMPLETE",
                        "completionStatus": "SUCCEEDED"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let tool = GetBuildActions {
            client: test_client(&server.uri()),
        };
        let result = tool.execute(json!({"buildRunId": "build-1"})).await.unwrap();

        let payload: serde_json::Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["actions"][0]["actionType"], "ARCHIVE");
    }
}
