//! Discovery tools: products, workflows, and workflow-creation guidance.

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
use crate::uri::{parse_product_id, parse_workflow_id};

pub fn register(registry: &mut ToolRegistry, client: Arc<XcodeCloudClient>) {
    registry.register(Arc::new(ListProducts {
        client: client.clone(),
    }));
    registry.register(Arc::new(ListWorkflows {
        client: client.clone(),
    }));
    registry.register(Arc::new(CreateWorkflowGuide {
        client: client.clone(),
    }));
    registry.register(Arc::new(GetWorkflow { client }));
}

struct ListProducts {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
struct ListProductsArgs {
    limit: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListProducts {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_products".to_string(),
            description: "List all Xcode Cloud products (repositories) associated with your \
                          Apple Developer account. Each product represents a repository \
                          configured for Xcode Cloud."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "limit": json_schema_number("Maximum number of products to return (default: 50)"),
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ListProductsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(CallToolResult::error(format!("Error listing products: {e}"))),
        };

        match self.client.products().list(args.limit).await {
            Ok(products) => {
                let formatted: Vec<_> = products
                    .iter()
                    .map(|product| {
                        json!({
                            "id": product.id,
                            "name": product.attributes.name,
                            "productType": product.attributes.product_type,
                            "createdDate": product.attributes.created_date,
                        })
                    })
                    .collect();
                Ok(json_result(json!({
                    "products": formatted,
                    "total": formatted.len(),
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!("Error listing products: {e}"))),
        }
    }
}

struct ListWorkflows {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListWorkflowsArgs {
    product_id: String,
    limit: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListWorkflows {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_workflows".to_string(),
            description: "List all Xcode Cloud workflows for a specific product. Workflows \
                          define the build, test, and deployment configuration."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "productId": json_schema_string(
                        "The product ID or resource URI (e.g., \"xcode-cloud://product/abc123\" or just \"abc123\")",
                    ),
                    "limit": json_schema_number("Maximum number of workflows to return (default: 50)"),
                }),
                vec!["productId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ListWorkflowsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error listing workflows: {e}"
                )))
            }
        };

        let product_id = parse_product_id(&args.product_id);
        match self
            .client
            .workflows()
            .list_for_product(product_id, args.limit)
            .await
        {
            Ok(workflows) => {
                let formatted: Vec<_> = workflows
                    .iter()
                    .map(|workflow| {
                        json!({
                            "id": workflow.id,
                            "name": workflow.attributes.name,
                            "description": workflow.attributes.description,
                            "isEnabled": workflow.attributes.is_enabled,
                            "clean": workflow.attributes.clean,
                            "lastModifiedDate": workflow.attributes.last_modified_date,
                        })
                    })
                    .collect();
                Ok(json_result(json!({
                    "workflows": formatted,
                    "total": formatted.len(),
                })))
            }
            Err(e) => Ok(CallToolResult::error(format!(
                "Error listing workflows: {e}"
            ))),
        }
    }
}

/// The `create_workflow` tool does not create anything itself: it gathers the
/// product, repository, and version IDs a caller needs, then points at
/// `create_workflow_with_actions` for the actual creation.
struct CreateWorkflowGuide {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorkflowGuideArgs {
    product_id: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CreateWorkflowGuide {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_workflow".to_string(),
            description: "Gather all required information to create an Xcode Cloud workflow. \
                          This tool helps you collect the product, repository, Xcode version, \
                          macOS version, and other details needed. Use \
                          create_workflow_with_actions to actually create the workflow once \
                          you have all required IDs."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "productId": json_schema_string(
                        "The product ID or resource URI. If omitted, returns available products.",
                    ),
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CreateWorkflowGuideArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Error gathering workflow info: {e}"
                )))
            }
        };

        match self.gather(args.product_id.as_deref()).await {
            Ok(payload) => Ok(json_result(payload)),
            Err(e) => Ok(CallToolResult::error(format!(
                "Error gathering workflow info: {e}"
            ))),
        }
    }
}

impl CreateWorkflowGuide {
    async fn gather(&self, product_id: Option<&str>) -> xcc_client::Result<serde_json::Value> {
        let Some(product_id) = product_id else {
            let products = self.client.products().list(None).await?;
            return Ok(json!({
                "status": "needs_product",
                "message": "Select a product to create a workflow for.",
                "availableProducts": products.iter().map(|p| json!({
                    "id": p.id,
                    "name": p.attributes.name,
                    "productType": p.attributes.product_type,
                })).collect::<Vec<_>>(),
                "nextStep": "Call create_workflow with productId parameter",
            }));
        };

        let product_id = parse_product_id(product_id);
        let product = self.client.products().get(product_id).await?;
        let workflows = self
            .client
            .workflows()
            .list_for_product(product_id, None)
            .await?;

        let primary_repository_id = product
            .relationships
            .as_ref()
            .and_then(|r| r.primary_repositories.as_ref())
            .and_then(|list| list.data.first())
            .map(|r| r.id.clone());

        let xcode_versions = self.client.xcode_versions().list(Some(10)).await?;
        let macos_versions = self.client.macos_versions().list(Some(10)).await?;

        Ok(json!({
            "status": "ready",
            "message": "Use create_workflow_with_actions with the following IDs to create a workflow.",
            "product": {
                "id": product.id,
                "name": product.attributes.name,
            },
            "existingWorkflows": workflows.iter().map(|w| json!({
                "id": w.id,
                "name": w.attributes.name,
                "isEnabled": w.attributes.is_enabled,
            })).collect::<Vec<_>>(),
            "repositoryId": primary_repository_id.clone()
                .unwrap_or_else(|| "Use get_repository to find this".to_string()),
            "availableXcodeVersions": xcode_versions.iter().map(|v| json!({
                "id": v.id,
                "name": v.attributes.name,
                "version": v.attributes.version,
            })).collect::<Vec<_>>(),
            "availableMacOsVersions": macos_versions.iter().map(|v| json!({
                "id": v.id,
                "name": v.attributes.name,
                "version": v.attributes.version,
            })).collect::<Vec<_>>(),
            "exampleUsage": {
                "tool": "create_workflow_with_actions",
                "arguments": {
                    "productId": product_id,
                    "repositoryId": primary_repository_id
                        .unwrap_or_else(|| "YOUR_REPOSITORY_ID".to_string()),
                    "xcodeVersionId": xcode_versions.first()
                        .map(|v| v.id.clone())
                        .unwrap_or_else(|| "YOUR_XCODE_VERSION_ID".to_string()),
                    "macOsVersionId": macos_versions.first()
                        .map(|v| v.id.clone())
                        .unwrap_or_else(|| "YOUR_MACOS_VERSION_ID".to_string()),
                    "name": format!("{} CI", product.attributes.name),
                    "description": "CI workflow with tests",
                    "containerFilePath": "YourApp.xcodeproj",
                    "actions": [
                        {
                            "name": "Build - iOS",
                            "actionType": "BUILD",
                            "platform": "IOS",
                            "scheme": "YourScheme",
                            "destination": "ANY_IOS_SIMULATOR",
                        },
                        {
                            "name": "Test - iOS",
                            "actionType": "TEST",
                            "platform": "IOS",
                            "scheme": "YourScheme",
                            "destination": "ANY_IOS_SIMULATOR",
                        },
                    ],
                },
            },
        }))
    }
}

struct GetWorkflow {
    client: Arc<XcodeCloudClient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetWorkflowArgs {
    workflow_id: String,
}

#[async_trait::async_trait]
impl Tool for GetWorkflow {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_workflow".to_string(),
            description: "Get detailed information about a specific Xcode Cloud workflow \
                          including its configuration and settings."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workflowId": json_schema_string(
                        "The workflow ID or resource URI (e.g., \"xcode-cloud://workflow/abc123\" or just \"abc123\")",
                    ),
                }),
                vec!["workflowId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetWorkflowArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(CallToolResult::error(format!("Error getting workflow: {e}"))),
        };

        let workflow_id = parse_workflow_id(&args.workflow_id);
        match self.client.workflows().get(workflow_id).await {
            Ok(workflow) => Ok(json_result(json!({
                "id": workflow.id,
                "name": workflow.attributes.name,
                "description": workflow.attributes.description,
                "isEnabled": workflow.attributes.is_enabled,
                "isLockedForEditing": workflow.attributes.is_locked_for_editing,
                "clean": workflow.attributes.clean,
                "containerFilePath": workflow.attributes.container_file_path,
                "lastModifiedDate": workflow.attributes.last_modified_date,
                "relationships": workflow.relationships,
            }))),
            Err(e) => Ok(CallToolResult::error(format!("Error getting workflow: {e}"))),
        }
    }
}
