//! Workflows API for Xcode Cloud.

use crate::api::limit_query;
use crate::client::XcodeCloudClient;
use crate::error::Result;
use crate::types::{
    ApiResponse, CiWorkflow, CreateWorkflowParams, CreateWorkflowRequest, UpdateWorkflowParams,
    UpdateWorkflowRequest,
};

/// API for Xcode Cloud workflow operations.
pub struct WorkflowsApi<'a> {
    client: &'a XcodeCloudClient,
}

impl<'a> WorkflowsApi<'a> {
    pub(crate) fn new(client: &'a XcodeCloudClient) -> Self {
        Self { client }
    }

    /// List workflows for a specific product.
    pub async fn list_for_product(
        &self,
        product_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<CiWorkflow>> {
        let response: ApiResponse<Vec<CiWorkflow>> = self
            .client
            .http
            .get_with_query(
                &format!("/v1/ciProducts/{product_id}/workflows"),
                &limit_query(limit),
            )
            .await?;
        Ok(response.data)
    }

    /// Get a specific workflow by ID.
    pub async fn get(&self, workflow_id: &str) -> Result<CiWorkflow> {
        let response: ApiResponse<CiWorkflow> = self
            .client
            .http
            .get(&format!("/v1/ciWorkflows/{workflow_id}"))
            .await?;
        Ok(response.data)
    }

    /// Create a new workflow for a product.
    pub async fn create(
        &self,
        product_id: &str,
        params: CreateWorkflowParams,
    ) -> Result<CiWorkflow> {
        let request = CreateWorkflowRequest::new(product_id, params);
        let response: ApiResponse<CiWorkflow> =
            self.client.http.post("/v1/ciWorkflows", &request).await?;
        Ok(response.data)
    }

    /// Apply a partial update to a workflow. Only the fields supplied in
    /// `params` are sent; everything else is left untouched server-side.
    pub async fn update(
        &self,
        workflow_id: &str,
        params: UpdateWorkflowParams,
    ) -> Result<CiWorkflow> {
        let request = UpdateWorkflowRequest::new(workflow_id, params);
        let response: ApiResponse<CiWorkflow> = self
            .client
            .http
            .patch(&format!("/v1/ciWorkflows/{workflow_id}"), &request)
            .await?;
        Ok(response.data)
    }

    /// Delete a workflow. Irreversible.
    pub async fn delete(&self, workflow_id: &str) -> Result<()> {
        self.client
            .http
            .delete(&format!("/v1/ciWorkflows/{workflow_id}"))
            .await
    }
}
