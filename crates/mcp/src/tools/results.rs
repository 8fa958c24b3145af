//! Build results tools: logs/artifacts and issue counts.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use xcc_client::types::CiArtifact;
use xcc_client::XcodeCloudClient;

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::json_result;
use crate::tools::registry::{json_schema_object, json_schema_string, Tool, ToolRegistry};
use crate::uri::parse_build_run_id;

pub fn register(registry: &mut ToolRegistry, client: Arc<XcodeCloudClient>) {
    registry.register(Arc::new(GetBuildLogs {
        client: client.clone(),
    }));
    registry.register(Arc::new(GetBuildIssues { client }));
}

fn artifact_summary(artifact: &CiArtifact) -> serde_json::Value {
    json!({
        "id": artifact.id,
        "fileName": artifact.attributes.file_name,
        "fileSize": artifact.attributes.file_size,
        "downloadUrl": artifact.attributes.download_url,
    })
}

struct GetBuildLogs {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBuildLogsArgs {
    build_run_id: String,
}

#[async_trait::async_trait]
impl Tool for GetBuildLogs {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_build_logs".to_string(),
            description: "Retrieve build logs and artifacts for a build run. Returns download \
                          URLs for log files, archives, and other artifacts."
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
        let args: GetBuildLogsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting build artifacts: {e}"
                )))
            }
        };

        let build_run_id = parse_build_run_id(&args.build_run_id);
        match self.client.artifacts().list_for_build_run(build_run_id).await {
            Ok(artifacts) => {
                let logs: Vec<_> = artifacts.logs.iter().map(artifact_summary).collect();
                let archives: Vec<_> = artifacts.archives.iter().map(artifact_summary).collect();
                let other: Vec<_> = artifacts
                    .other
                    .iter()
                    .map(|a| {
                        json!({
                            "id": a.id,
                            "fileName": a.attributes.file_name,
                            "fileType": a.attributes.file_type,
                            "fileSize": a.attributes.file_size,
                            "downloadUrl": a.attributes.download_url,
                        })
                    })
                    .collect();
                let total = logs.len() + archives.len() + other.len();

                Ok(json_result(json!({
                    "message": "Artifacts available. Use the downloadUrl to retrieve files.",
                    "logs": logs,
                    "archives": archives,
                    "other": other,
                    "total": total,
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting build artifacts: {e}"
            ))),
        }
    }
}

struct GetBuildIssues {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBuildIssuesArgs {
    build_run_id: String,
}

#[async_trait::async_trait]
impl Tool for GetBuildIssues {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_build_issues".to_string(),
            description: "Get issue counts (warnings, errors, analyzer warnings, test \
                          failures) from a build run. Note: Detailed issue listings may not \
                          be available through the API, but issue counts are included in \
                          build run status."
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
        let args: GetBuildIssuesArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting build issues: {e}"
                )))
            }
        };

        let build_run_id = parse_build_run_id(&args.build_run_id);
        match self.client.builds().get(build_run_id).await {
            Ok(build) => {
                let issue_counts = build.attributes.issue_counts.clone().unwrap_or_default();
                Ok(json_result(json!({
                    "buildRunId": args.build_run_id,
                    "buildNumber": build.attributes.number,
                    "issueCounts": issue_counts,
                    "message": "Issue counts from build run. For detailed logs, use get_build_logs to download log files.",
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting build issues: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{result_text, test_client};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_build_logs_buckets_artifacts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciBuildRuns/build-1/artifacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {
                        "id": "a1",
                        "attributes": {
                            "fileName": "build.log",
                            "fileType": "LOG",
                            "fileSize": 2048,
                            "downloadUrl": "https://cdn.example.com/a1"
                        }
                    },
                    {
                        "id": "a2",
                        "attributes": {
                            "fileName": "App.xcarchive",
                            "fileType": "XCODEBUILD_ARCHIVE",
                            "fileSize": 409600,
                            "downloadUrl": "https://cdn.example.com/a2"
                        }
                    },
                    {
                        "id": "a3",
                        "attributes": {
                            "fileName": "mystery.bin",
                            "fileType": "SOMETHING_NEW"
                        }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let tool = GetBuildLogs {
            client: test_client(&server.uri()),
        };
        let result = tool.execute(json!({"buildRunId": "build-1"})).await.unwrap();

        let payload: serde_json::Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["logs"][0]["fileName"], "build.log");
        assert_eq!(payload["archives"][0]["id"], "a2");
        assert_eq!(payload["other"][0]["fileType"], "OTHER");
        assert_eq!(payload["total"], 3);
    }

    #[tokio::test]
    async fn test_get_build_issues_defaults_missing_counts_to_zero() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciBuildRuns/build-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "id": "build-1",
                    "attributes": {
                        "number": 3,
                        "executionProgress": "RUNNING",
                        "isPullRequestBuild": false
                    }
                }
            })))
            .mount(&server)
            .await;

        let tool = GetBuildIssues {
            client: test_client(&server.uri()),
        };
        let result = tool.execute(json!({"buildRunId": "build-1"})).await.unwrap();

        let payload: serde_json::Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(payload["issueCounts"]["errors"], 0);
        assert_eq!(payload["issueCounts"]["testFailures"], 0);
        assert_eq!(payload["buildNumber"], 3);
    }
}
