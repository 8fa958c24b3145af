//! Test results tools: failure counts and test artifacts.

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
    registry.register(Arc::new(GetTestResults {
        client: client.clone(),
    }));
    registry.register(Arc::new(GetTestArtifacts { client }));
}

fn artifact_summary(artifact: &CiArtifact) -> serde_json::Value {
    json!({
        "id": artifact.id,
        "fileName": artifact.attributes.file_name,
        "fileSize": artifact.attributes.file_size,
        "downloadUrl": artifact.attributes.download_url,
    })
}

struct GetTestResults {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTestResultsArgs {
    build_run_id: String,
}

#[async_trait::async_trait]
impl Tool for GetTestResults {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_test_results".to_string(),
            description: "Get test failure count from a build run. For detailed test logs, \
                          use get_build_logs to download the result bundle."
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
        let args: GetTestResultsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting test results: {e}"
                )))
            }
        };

        let build_run_id = parse_build_run_id(&args.build_run_id);
        let outcome = async {
            let build = self.client.builds().get(build_run_id).await?;
            let artifacts = self.client.artifacts().list_for_build_run(build_run_id).await?;
            Ok::<_, xcc_client::Error>((build, artifacts))
        }
        .await;

        match outcome {
            Ok((build, artifacts)) => {
                let test_failures = build
                    .attributes
                    .issue_counts
                    .as_ref()
                    .map(|c| c.test_failures)
                    .unwrap_or(0);
                let result_bundles: Vec<_> = artifacts
                    .result_bundles
                    .iter()
                    .map(|a| {
                        json!({
                            "id": a.id,
                            "fileName": a.attributes.file_name,
                            "downloadUrl": a.attributes.download_url,
                        })
                    })
                    .collect();
                let message = if test_failures > 0 {
                    format!(
                        "Found {test_failures} test failure(s). Download result bundles for \
                         detailed test information."
                    )
                } else {
                    "No test failures detected.".to_string()
                };

                Ok(json_result(json!({
                    "buildRunId": args.build_run_id,
                    "buildNumber": build.attributes.number,
                    "testFailures": test_failures,
                    "resultBundles": result_bundles,
                    "message": message,
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting test results: {e}"
            ))),
        }
    }
}

struct GetTestArtifacts {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTestArtifactsArgs {
    build_run_id: String,
}

#[async_trait::async_trait]
impl Tool for GetTestArtifacts {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_test_artifacts".to_string(),
            description: "Get test-related artifacts (screenshots, videos, result bundles) \
                          from a build run. These are especially useful for diagnosing failed \
                          UI tests."
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
        let args: GetTestArtifactsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting test artifacts: {e}"
                )))
            }
        };

        let build_run_id = parse_build_run_id(&args.build_run_id);
        match self.client.artifacts().list_for_build_run(build_run_id).await {
            Ok(artifacts) => {
                let screenshots: Vec<_> =
                    artifacts.screenshots.iter().map(artifact_summary).collect();
                let videos: Vec<_> = artifacts.videos.iter().map(artifact_summary).collect();
                let result_bundles: Vec<_> =
                    artifacts.result_bundles.iter().map(artifact_summary).collect();
                let test_products: Vec<_> =
                    artifacts.test_products.iter().map(artifact_summary).collect();

                let total = screenshots.len()
                    + videos.len()
                    + result_bundles.len()
                    + test_products.len();
                let message = if total > 0 {
                    "Use the downloadUrl to retrieve test artifacts."
                } else {
                    "No test artifacts found for this build run."
                };

                Ok(json_result(json!({
                    "screenshots": screenshots,
                    "videos": videos,
                    "resultBundles": result_bundles,
                    "testProducts": test_products,
                    "total": total,
                    "message": message,
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting test artifacts: {e}"
            ))),
        }
    }
}
