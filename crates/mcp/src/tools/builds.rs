//! Build trigger tools: start, cancel, and start-and-wait.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use xcc_client::{WaitOptions, XcodeCloudClient};

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::json_result;
use crate::tools::registry::{
    json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry,
};
use crate::uri::{parse_build_run_id, parse_workflow_id};

pub fn register(registry: &mut ToolRegistry, client: Arc<XcodeCloudClient>) {
    registry.register(Arc::new(StartBuild {
        client: client.clone(),
    }));
    registry.register(Arc::new(CancelBuild {
        client: client.clone(),
    }));
    registry.register(Arc::new(StartBuildAndWait { client }));
}

struct StartBuild {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartBuildArgs {
    workflow_id: String,
    git_reference_id: Option<String>,
}

#[async_trait::async_trait]
impl Tool for StartBuild {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "start_build".to_string(),
            description: "Trigger a new Xcode Cloud build for a specific workflow. Optionally \
                          specify a git reference (branch or tag) to build."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workflowId": json_schema_string(
                        "The workflow ID or resource URI (e.g., \"xcode-cloud://workflow/abc123\" or just \"abc123\")",
                    ),
                    "gitReferenceId": json_schema_string(
                        "Optional: The ID of the git reference (branch/tag) to build. If not specified, uses the workflow's default branch.",
                    ),
                }),
                vec!["workflowId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: StartBuildArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(CallToolResult::error(format!("Error starting build: {e}"))),
        };

        let workflow_id = parse_workflow_id(&args.workflow_id);
        match self
            .client
            .builds()
            .start(workflow_id, args.git_reference_id.as_deref())
            .await
        {
            Ok(build) => Ok(json_result(json!({
                "id": build.id,
                "number": build.attributes.number,
                "executionProgress": build.attributes.execution_progress,
                "startReason": build.attributes.start_reason,
                "createdDate": build.attributes.created_date,
                "sourceCommit": build.attributes.source_commit,
            }))),
            Err(e) => Ok(CallToolResult::error(format!("Error starting build: {e}"))),
        }
    }
}

struct CancelBuild {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelBuildArgs {
    build_run_id: String,
}

#[async_trait::async_trait]
impl Tool for CancelBuild {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "cancel_build".to_string(),
            description: "Cancel a running Xcode Cloud build. Only builds in PENDING or \
                          RUNNING state can be canceled."
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
        let args: CancelBuildArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(CallToolResult::error(format!("Error canceling build: {e}"))),
        };

        let build_run_id = parse_build_run_id(&args.build_run_id);
        match self.client.builds().cancel(build_run_id).await {
            Ok(()) => Ok(CallToolResult::text(format!(
                "Build {} has been canceled.",
                args.build_run_id
            ))),
            Err(e) => Ok(CallToolResult::error(format!("Error canceling build: {e}"))),
        }
    }
}

struct StartBuildAndWait {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartBuildAndWaitArgs {
    workflow_id: String,
    git_reference_id: Option<String>,
    poll_interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

#[async_trait::async_trait]
impl Tool for StartBuildAndWait {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "start_build_and_wait".to_string(),
            description: "Start an Xcode Cloud build and wait for it to complete. The server \
                          polls the build status internally, eliminating the need for repeated \
                          client tool calls. Returns the final build status when complete."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workflowId": json_schema_string(
                        "The workflow ID or resource URI (e.g., \"xcode-cloud://workflow/abc123\" or just \"abc123\")",
                    ),
                    "gitReferenceId": json_schema_string(
                        "Optional: The ID of the git reference (branch/tag) to build. If not specified, uses the workflow's default branch.",
                    ),
                    "pollIntervalMs": json_schema_number(
                        "Polling interval in milliseconds (default: 30000 = 30 seconds)",
                    ),
                    "timeoutMs": json_schema_number(
                        "Maximum time to wait in milliseconds (default: 3600000 = 1 hour)",
                    ),
                }),
                vec!["workflowId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: StartBuildAndWaitArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error in start_build_and_wait: {e}"
                )))
            }
        };

        let defaults = WaitOptions::default();
        let options = WaitOptions {
            poll_interval: args
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            timeout: args
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        };

        let workflow_id = parse_workflow_id(&args.workflow_id);
        let outcome = match self
            .client
            .builds()
            .start_and_wait(workflow_id, args.git_reference_id.as_deref(), options)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error in start_build_and_wait: {e}"
                )))
            }
        };

        let attributes = &outcome.build.attributes;
        if outcome.timed_out {
            // The build is still running upstream; report the last snapshot
            // as a normal result so the agent can keep polling by ID.
            return Ok(json_result(json!({
                "id": outcome.build.id,
                "number": attributes.number,
                "executionProgress": attributes.execution_progress,
                "completionStatus": attributes.completion_status,
                "createdDate": attributes.created_date,
                "startedDate": attributes.started_date,
                "finishedDate": attributes.finished_date,
                "sourceCommit": attributes.source_commit,
                "issueCounts": attributes.issue_counts,
                "timeoutExceeded": true,
                "totalDurationMs": outcome.total_duration_ms,
                "pollCount": outcome.poll_count,
            })));
        }

        Ok(json_result(json!({
            "id": outcome.build.id,
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
            "totalDurationMs": outcome.total_duration_ms,
            "pollCount": outcome.poll_count,
        })))
    }
}
