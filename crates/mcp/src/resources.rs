//! Dynamic MCP resources for browsing Xcode Cloud entities.
//!
//! `resources/list` enumerates products and their workflows as
//! `xcode-cloud://` URIs on each request, so the listing stays in sync with
//! App Store Connect. `resources/read` resolves any URI the listing hands
//! out (plus build-run URIs tools return) into a JSON document.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::warn;
use xcc_client::XcodeCloudClient;

use crate::protocol::{ReadResourceResult, ResourceContents, ResourceSchema};
use crate::uri::{parse_resource_uri, ResourceUri};

const JSON_MIME: &str = "application/json";

pub struct ResourceProvider {
    client: Arc<XcodeCloudClient>,
}

impl ResourceProvider {
    pub fn new(client: Arc<XcodeCloudClient>) -> Self {
        Self { client }
    }

    /// Enumerate products and their workflows as resources. Failures degrade
    /// rather than fail the request: an unreachable product list yields an
    /// empty listing, and a product whose workflows cannot be fetched still
    /// appears on its own.
    pub async fn list(&self) -> Vec<ResourceSchema> {
        let products = match self.client.products().list(None).await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "failed to list products for resources");
                return Vec::new();
            }
        };

        let mut resources = Vec::new();
        for product in &products {
            resources.push(ResourceSchema {
                uri: format!("xcode-cloud://product/{}", product.id),
                name: format!("Product: {}", product.attributes.name),
                description: format!(
                    "Xcode Cloud product ({})",
                    product.attributes.product_type.as_deref().unwrap_or("unknown")
                ),
                mime_type: JSON_MIME.to_string(),
            });

            match self
                .client
                .workflows()
                .list_for_product(&product.id, None)
                .await
            {
                Ok(workflows) => {
                    for workflow in &workflows {
                        resources.push(ResourceSchema {
                            uri: format!("xcode-cloud://workflow/{}", workflow.id),
                            name: format!("Workflow: {}", workflow.attributes.name),
                            description: format!(
                                "{} - {} ({})",
                                product.attributes.name,
                                workflow.attributes.name,
                                if workflow.attributes.is_enabled {
                                    "enabled"
                                } else {
                                    "disabled"
                                }
                            ),
                            mime_type: JSON_MIME.to_string(),
                        });
                    }
                }
                Err(e) => {
                    warn!(
                        product_id = %product.id,
                        error = %e,
                        "failed to list workflows for product"
                    );
                }
            }
        }

        resources
    }

    /// Resolve one resource URI to its JSON document.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult> {
        let document = match parse_resource_uri(uri) {
            Some(ResourceUri::Product(id)) => {
                let product = self.client.products().get(id).await?;
                json!({
                    "id": product.id,
                    "name": product.attributes.name,
                    "productType": product.attributes.product_type,
                    "createdDate": product.attributes.created_date,
                })
            }
            Some(ResourceUri::Workflow(id)) => {
                let workflow = self.client.workflows().get(id).await?;
                json!({
                    "id": workflow.id,
                    "name": workflow.attributes.name,
                    "description": workflow.attributes.description,
                    "isEnabled": workflow.attributes.is_enabled,
                    "isLockedForEditing": workflow.attributes.is_locked_for_editing,
                    "clean": workflow.attributes.clean,
                    "containerFilePath": workflow.attributes.container_file_path,
                    "lastModifiedDate": workflow.attributes.last_modified_date,
                })
            }
            Some(ResourceUri::BuildRun(id)) => {
                let build = self.client.builds().get(id).await?;
                json!({
                    "id": build.id,
                    "number": build.attributes.number,
                    "executionProgress": build.attributes.execution_progress,
                    "completionStatus": build.attributes.completion_status,
                    "createdDate": build.attributes.created_date,
                    "startedDate": build.attributes.started_date,
                    "finishedDate": build.attributes.finished_date,
                    "sourceCommit": build.attributes.source_commit,
                    "issueCounts": build.attributes.issue_counts,
                })
            }
            None => return Err(anyhow!("Unsupported resource URI: {uri}")),
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: JSON_MIME.to_string(),
                text: serde_json::to_string_pretty(&document)?,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::test_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_enumerates_products_and_workflows() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciProducts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "prod-1",
                    "attributes": {"name": "Demo App", "productType": "APP"}
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/ciProducts/prod-1/workflows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "wf-1",
                    "attributes": {
                        "name": "Nightly",
                        "isEnabled": false,
                        "clean": false,
                        "containerFilePath": "App.xcodeproj"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let provider = ResourceProvider::new(test_client(&server.uri()));
        let resources = provider.list().await;

        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].uri, "xcode-cloud://product/prod-1");
        assert_eq!(resources[0].name, "Product: Demo App");
        assert_eq!(resources[1].uri, "xcode-cloud://workflow/wf-1");
        assert_eq!(resources[1].description, "Demo App - Nightly (disabled)");
    }

    #[tokio::test]
    async fn test_list_keeps_product_when_workflow_fetch_fails() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciProducts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "prod-1", "attributes": {"name": "Demo App"}}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/ciProducts/prod-1/workflows"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let provider = ResourceProvider::new(test_client(&server.uri()));
        let resources = provider.list().await;

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, "xcode-cloud://product/prod-1");
    }

    #[tokio::test]
    async fn test_list_degrades_to_empty_on_product_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciProducts"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let provider = ResourceProvider::new(test_client(&server.uri()));
        assert!(provider.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_workflow_uri() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciWorkflows/wf-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "id": "wf-1",
                    "attributes": {
                        "name": "Nightly",
                        "description": "Nightly build",
                        "isEnabled": true,
                        "clean": true,
                        "containerFilePath": "App.xcodeproj"
                    }
                }
            })))
            .mount(&server)
            .await;

        let provider = ResourceProvider::new(test_client(&server.uri()));
        let result = provider.read("xcode-cloud://workflow/wf-1").await.unwrap();

        assert_eq!(result.contents.len(), 1);
        assert_eq!(result.contents[0].uri, "xcode-cloud://workflow/wf-1");
        assert_eq!(result.contents[0].mime_type, "application/json");
        let document: serde_json::Value =
            serde_json::from_str(&result.contents[0].text).unwrap();
        assert_eq!(document["name"], "Nightly");
        assert_eq!(document["clean"], true);
    }

    #[tokio::test]
    async fn test_read_build_run_uri() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciBuildRuns/build-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "id": "build-1",
                    "attributes": {
                        "number": 7,
                        "executionProgress": "COMPLETE",
                        "completionStatus": "SUCCEEDED",
                        "isPullRequestBuild": false
                    }
                }
            })))
            .mount(&server)
            .await;

        let provider = ResourceProvider::new(test_client(&server.uri()));
        let result = provider
            .read("xcode-cloud://build-run/build-1")
            .await
            .unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&result.contents[0].text).unwrap();
        assert_eq!(document["number"], 7);
        assert_eq!(document["completionStatus"], "SUCCEEDED");
    }

    #[tokio::test]
    async fn test_read_rejects_unsupported_uri() {
        let server = MockServer::start().await;

        let provider = ResourceProvider::new(test_client(&server.uri()));
        let err = provider
            .read("xcode-cloud://artifact/a1")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Unsupported resource URI"));
    }
}
