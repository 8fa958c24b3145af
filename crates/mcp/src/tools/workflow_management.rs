//! Workflow management tools: version discovery, repository lookup, and
//! workflow create/update/delete.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use xcc_client::types::{
    CiAction, CiBranchStartCondition, CreateWorkflowParams, UpdateWorkflowParams,
};
use xcc_client::XcodeCloudClient;

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::json_result;
use crate::tools::registry::{
    json_schema_array, json_schema_boolean, json_schema_number, json_schema_object,
    json_schema_string, Tool, ToolRegistry,
};
use crate::uri::{parse_product_id, parse_workflow_id};

pub fn register(registry: &mut ToolRegistry, client: Arc<XcodeCloudClient>) {
    registry.register(Arc::new(ListXcodeVersions {
        client: client.clone(),
    }));
    registry.register(Arc::new(ListMacOsVersions {
        client: client.clone(),
    }));
    registry.register(Arc::new(ListCompatibleMacOsVersions {
        client: client.clone(),
    }));
    registry.register(Arc::new(GetTestDestinations {
        client: client.clone(),
    }));
    registry.register(Arc::new(GetRepository {
        client: client.clone(),
    }));
    registry.register(Arc::new(UpdateWorkflow {
        client: client.clone(),
    }));
    registry.register(Arc::new(DeleteWorkflow {
        client: client.clone(),
    }));
    registry.register(Arc::new(CreateWorkflowWithActions { client }));
}

/// Input schema fragment for a workflow action, shared by the create and
/// update tools.
fn action_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "name": json_schema_string("Display name for the action"),
            "actionType": {
                "type": "string",
                "enum": ["BUILD", "ANALYZE", "TEST", "ARCHIVE"],
                "description": "Type of action to perform"
            },
            "destination": {
                "type": "string",
                "enum": [
                    "ANY_IOS_DEVICE",
                    "ANY_IOS_SIMULATOR",
                    "ANY_TVOS_DEVICE",
                    "ANY_TVOS_SIMULATOR",
                    "ANY_WATCHOS_DEVICE",
                    "ANY_WATCHOS_SIMULATOR",
                    "ANY_MAC",
                    "ANY_MAC_CATALYST",
                    "ANY_VISIONOS_DEVICE",
                    "ANY_VISIONOS_SIMULATOR"
                ],
                "description": "Destination device type for the action"
            },
            "platform": {
                "type": "string",
                "enum": ["MACOS", "IOS", "TVOS", "WATCHOS", "VISIONOS"],
                "description": "Platform for the action"
            },
            "scheme": json_schema_string("Xcode scheme to use for the action"),
            "isRequiredToPass": json_schema_boolean(
                "Whether this action must pass for the build to succeed",
            ),
            "testConfig": {
                "type": "object",
                "description": "Test configuration (required for TEST actions)",
                "properties": {
                    "kind": {
                        "type": "string",
                        "enum": ["USE_SCHEME_SETTINGS", "SPECIFIC_TEST_PLANS"],
                        "description": "Test configuration kind"
                    },
                    "testPlanName": json_schema_string("Name of the test plan to use"),
                    "testDestinations": json_schema_array(
                        json!({
                            "type": "object",
                            "properties": {
                                "deviceTypeName": json_schema_string("Device type name (e.g., \"iPhone 16\")"),
                                "deviceTypeIdentifier": json_schema_string(
                                    "Device type identifier (e.g., \"com.apple.CoreSimulator.SimDeviceType.iPhone-16\")",
                                ),
                                "runtimeName": json_schema_string("Runtime name (e.g., \"iOS 18.1\")"),
                                "runtimeIdentifier": json_schema_string(
                                    "Runtime identifier (e.g., \"com.apple.CoreSimulator.SimRuntime.iOS-18-1\")",
                                ),
                                "kind": {
                                    "type": "string",
                                    "enum": ["SIMULATOR", "MAC"],
                                    "description": "Kind of test destination"
                                }
                            }
                        }),
                        "Test destinations for running tests",
                    )
                }
            }
        },
        "required": ["name", "actionType"]
    })
}

struct ListXcodeVersions {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
struct ListVersionsArgs {
    limit: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListXcodeVersions {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_xcode_versions".to_string(),
            description: "List all available Xcode versions for Xcode Cloud workflows. Use \
                          these IDs when creating or updating workflows."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "limit": json_schema_number("Maximum number of versions to return (default: 50)"),
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ListVersionsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error listing Xcode versions: {e}"
                )))
            }
        };

        match self.client.xcode_versions().list(args.limit).await {
            Ok(versions) => {
                let formatted: Vec<_> = versions
                    .iter()
                    .map(|v| {
                        json!({
                            "id": v.id,
                            "version": v.attributes.version,
                            "name": v.attributes.name,
                        })
                    })
                    .collect();
                Ok(json_result(json!({
                    "xcodeVersions": formatted,
                    "total": formatted.len(),
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error listing Xcode versions: {e}"
            ))),
        }
    }
}

struct ListMacOsVersions {
    client: Arc<XcodeCloudClient>,
}

#[async_trait::async_trait]
impl Tool for ListMacOsVersions {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_macos_versions".to_string(),
            description: "List all available macOS versions for Xcode Cloud workflows. Use \
                          these IDs when creating or updating workflows."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "limit": json_schema_number("Maximum number of versions to return (default: 50)"),
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ListVersionsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error listing macOS versions: {e}"
                )))
            }
        };

        match self.client.macos_versions().list(args.limit).await {
            Ok(versions) => {
                let formatted: Vec<_> = versions
                    .iter()
                    .map(|v| {
                        json!({
                            "id": v.id,
                            "version": v.attributes.version,
                            "name": v.attributes.name,
                        })
                    })
                    .collect();
                Ok(json_result(json!({
                    "macOsVersions": formatted,
                    "total": formatted.len(),
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error listing macOS versions: {e}"
            ))),
        }
    }
}

struct ListCompatibleMacOsVersions {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct XcodeVersionArgs {
    xcode_version_id: String,
}

#[async_trait::async_trait]
impl Tool for ListCompatibleMacOsVersions {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_compatible_macos_versions".to_string(),
            description: "List macOS versions compatible with a specific Xcode version."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "xcodeVersionId": json_schema_string(
                        "The Xcode version ID to get compatible macOS versions for",
                    ),
                }),
                vec!["xcodeVersionId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: XcodeVersionArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error listing compatible macOS versions: {e}"
                )))
            }
        };

        match self
            .client
            .xcode_versions()
            .macos_versions(&args.xcode_version_id, None)
            .await
        {
            Ok(versions) => {
                let formatted: Vec<_> = versions
                    .iter()
                    .map(|v| {
                        json!({
                            "id": v.id,
                            "version": v.attributes.version,
                            "name": v.attributes.name,
                        })
                    })
                    .collect();
                Ok(json_result(json!({
                    "xcodeVersionId": args.xcode_version_id,
                    "compatibleMacOsVersions": formatted,
                    "total": formatted.len(),
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error listing compatible macOS versions: {e}"
            ))),
        }
    }
}

struct GetTestDestinations {
    client: Arc<XcodeCloudClient>,
}

#[async_trait::async_trait]
impl Tool for GetTestDestinations {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_test_destinations".to_string(),
            description: "Get available test destinations (simulators/devices) for a specific \
                          Xcode version. Use these when configuring TEST actions in workflows."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "xcodeVersionId": json_schema_string(
                        "The Xcode version ID to get test destinations for",
                    ),
                }),
                vec!["xcodeVersionId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: XcodeVersionArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting test destinations: {e}"
                )))
            }
        };

        match self.client.xcode_versions().get(&args.xcode_version_id).await {
            Ok(version) => {
                let destinations = version.attributes.test_destinations.unwrap_or_default();
                Ok(json_result(json!({
                    "xcodeVersionId": args.xcode_version_id,
                    "xcodeVersion": version.attributes.name,
                    "testDestinations": destinations,
                    "total": destinations.len(),
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting test destinations: {e}"
            ))),
        }
    }
}

struct GetRepository {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRepositoryArgs {
    product_id: String,
}

#[async_trait::async_trait]
impl Tool for GetRepository {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_repository".to_string(),
            description: "Get the SCM repository information for a product. Returns the \
                          repository ID needed for creating workflows."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "productId": json_schema_string(
                        "The product ID or resource URI to get repository info for",
                    ),
                }),
                vec!["productId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetRepositoryArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error getting repository: {e}"
                )))
            }
        };

        let product_id = parse_product_id(&args.product_id);
        match self.client.repositories().get_for_product(product_id).await {
            Ok(Some(repository)) => Ok(json_result(json!({
                "repository": {
                    "id": repository.id,
                    "ownerName": repository.attributes.owner_name,
                    "repositoryName": repository.attributes.repository_name,
                    "httpCloneUrl": repository.attributes.http_clone_url,
                    "sshCloneUrl": repository.attributes.ssh_clone_url,
                },
            }))),
            Ok(None) => Ok(CallToolResult::error(
                serde_json::to_string_pretty(&json!({
                    "error": "No repository found for this product",
                    "productId": product_id,
                }))
                .unwrap(),
            )),
            Err(e) => Ok(CallToolResult::error(format!(
                "Error getting repository: {e}"
            ))),
        }
    }
}

struct UpdateWorkflow {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateWorkflowArgs {
    workflow_id: String,
    name: Option<String>,
    description: Option<String>,
    is_enabled: Option<bool>,
    clean: Option<bool>,
    actions: Option<Vec<CiAction>>,
}

#[async_trait::async_trait]
impl Tool for UpdateWorkflow {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_workflow".to_string(),
            description: "Update an existing Xcode Cloud workflow. You can update the name, \
                          description, enabled state, actions, and start conditions."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workflowId": json_schema_string("The workflow ID or resource URI to update"),
                    "name": json_schema_string("New name for the workflow"),
                    "description": json_schema_string("New description for the workflow"),
                    "isEnabled": json_schema_boolean("Whether the workflow should be enabled"),
                    "clean": json_schema_boolean("Whether to run clean builds"),
                    "actions": json_schema_array(
                        action_schema(),
                        "Array of actions (BUILD, TEST, ANALYZE, ARCHIVE) to configure for this workflow",
                    ),
                }),
                vec!["workflowId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: UpdateWorkflowArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error updating workflow: {e}"
                )))
            }
        };

        let workflow_id = parse_workflow_id(&args.workflow_id);
        let params = UpdateWorkflowParams {
            name: args.name,
            description: args.description,
            is_enabled: args.is_enabled,
            clean: args.clean,
            actions: args.actions,
            ..Default::default()
        };

        match self.client.workflows().update(workflow_id, params).await {
            Ok(updated) => Ok(json_result(json!({
                "status": "updated",
                "message": "Workflow updated successfully.",
                "workflow": {
                    "id": updated.id,
                    "name": updated.attributes.name,
                    "description": updated.attributes.description,
                    "isEnabled": updated.attributes.is_enabled,
                    "clean": updated.attributes.clean,
                    "containerFilePath": updated.attributes.container_file_path,
                },
            }))),
            Err(e) => Ok(CallToolResult::error(format!(
                "Error updating workflow: {e}"
            ))),
        }
    }
}

struct DeleteWorkflow {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteWorkflowArgs {
    workflow_id: String,
}

#[async_trait::async_trait]
impl Tool for DeleteWorkflow {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_workflow".to_string(),
            description: "Delete an Xcode Cloud workflow. This action cannot be undone."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workflowId": json_schema_string("The workflow ID or resource URI to delete"),
                }),
                vec!["workflowId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: DeleteWorkflowArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error deleting workflow: {e}"
                )))
            }
        };

        let workflow_id = parse_workflow_id(&args.workflow_id);
        match self.client.workflows().delete(workflow_id).await {
            Ok(()) => Ok(json_result(json!({
                "status": "deleted",
                "message": "Workflow deleted successfully.",
                "workflowId": workflow_id,
            }))),
            Err(e) => Ok(CallToolResult::error(format!(
                "Error deleting workflow: {e}"
            ))),
        }
    }
}

struct CreateWorkflowWithActions {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorkflowWithActionsArgs {
    product_id: String,
    repository_id: String,
    xcode_version_id: String,
    mac_os_version_id: String,
    name: String,
    description: String,
    container_file_path: String,
    actions: Vec<CiAction>,
    is_enabled: Option<bool>,
    clean: Option<bool>,
    branch_start_condition: Option<CiBranchStartCondition>,
}

#[async_trait::async_trait]
impl Tool for CreateWorkflowWithActions {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_workflow_with_actions".to_string(),
            description: "Create a new Xcode Cloud workflow with full configuration including \
                          actions (BUILD, TEST, ANALYZE, ARCHIVE). Requires product ID, \
                          repository ID, Xcode version ID, and macOS version ID."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "productId": json_schema_string("The product ID to create the workflow for"),
                    "repositoryId": json_schema_string(
                        "The SCM repository ID (use get_repository to find this)",
                    ),
                    "xcodeVersionId": json_schema_string(
                        "The Xcode version ID (use list_xcode_versions to find this)",
                    ),
                    "macOsVersionId": json_schema_string(
                        "The macOS version ID (use list_macos_versions or list_compatible_macos_versions to find this)",
                    ),
                    "name": json_schema_string("Name for the workflow"),
                    "description": json_schema_string("Description for the workflow"),
                    "containerFilePath": json_schema_string(
                        "Path to the .xcodeproj or .xcworkspace in the repo (e.g., \"App/App.xcodeproj\")",
                    ),
                    "actions": json_schema_array(
                        action_schema(),
                        "Array of actions (BUILD, TEST, ANALYZE, ARCHIVE) to configure for this workflow",
                    ),
                    "isEnabled": json_schema_boolean(
                        "Whether the workflow should be enabled (default: true)",
                    ),
                    "clean": json_schema_boolean("Whether to run clean builds (default: false)"),
                    "branchStartCondition": {
                        "type": "object",
                        "description": "Branch start condition for automatic builds on branch changes",
                        "properties": {
                            "source": {
                                "type": "object",
                                "properties": {
                                    "isAllMatch": {"type": "boolean"},
                                    "patterns": {
                                        "type": "array",
                                        "items": {
                                            "type": "object",
                                            "properties": {
                                                "pattern": {"type": "string"},
                                                "isPrefix": {"type": "boolean"}
                                            },
                                            "required": ["pattern"]
                                        }
                                    }
                                }
                            },
                            "autoCancel": {"type": "boolean"}
                        }
                    },
                }),
                vec![
                    "productId",
                    "repositoryId",
                    "xcodeVersionId",
                    "macOsVersionId",
                    "name",
                    "description",
                    "containerFilePath",
                    "actions",
                ],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CreateWorkflowWithActionsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error creating workflow: {e}"
                )))
            }
        };

        let product_id = parse_product_id(&args.product_id).to_string();
        let params = CreateWorkflowParams {
            name: args.name,
            description: Some(args.description),
            is_enabled: args.is_enabled,
            clean: args.clean,
            container_file_path: args.container_file_path,
            repository_id: args.repository_id,
            xcode_version_id: args.xcode_version_id,
            mac_os_version_id: args.mac_os_version_id,
            actions: args.actions,
            branch_start_condition: args.branch_start_condition,
            manual_branch_start_condition: None,
        };

        match self.client.workflows().create(&product_id, params).await {
            Ok(created) => Ok(json_result(json!({
                "status": "created",
                "message": "Workflow created successfully with actions.",
                "workflow": {
                    "id": created.id,
                    "name": created.attributes.name,
                    "description": created.attributes.description,
                    "isEnabled": created.attributes.is_enabled,
                    "clean": created.attributes.clean,
                    "containerFilePath": created.attributes.container_file_path,
                },
            }))),
            Err(e) => Ok(CallToolResult::error(format!(
                "Error creating workflow: {e}"
            ))),
        }
    }
}
