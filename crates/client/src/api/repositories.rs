//! SCM repositories API.

use crate::api::limit_query;
use crate::client::XcodeCloudClient;
use crate::error::Result;
use crate::types::{ApiResponse, ScmGitReference, ScmRepository};

/// API for source control repositories linked to Xcode Cloud.
pub struct RepositoriesApi<'a> {
    client: &'a XcodeCloudClient,
}

impl<'a> RepositoriesApi<'a> {
    pub(crate) fn new(client: &'a XcodeCloudClient) -> Self {
        Self { client }
    }

    /// Get the primary repository of a product, if one is linked.
    pub async fn get_for_product(&self, product_id: &str) -> Result<Option<ScmRepository>> {
        let response: ApiResponse<Vec<ScmRepository>> = self
            .client
            .http
            .get(&format!("/v1/ciProducts/{product_id}/primaryRepositories"))
            .await?;
        Ok(response.data.into_iter().next())
    }

    /// Get the repository a workflow builds from.
    pub async fn get_for_workflow(&self, workflow_id: &str) -> Result<ScmRepository> {
        let response: ApiResponse<ScmRepository> = self
            .client
            .http
            .get(&format!("/v1/ciWorkflows/{workflow_id}/repository"))
            .await?;
        Ok(response.data)
    }

    /// Get a specific repository by ID.
    pub async fn get(&self, repository_id: &str) -> Result<ScmRepository> {
        let response: ApiResponse<ScmRepository> = self
            .client
            .http
            .get(&format!("/v1/scmRepositories/{repository_id}"))
            .await?;
        Ok(response.data)
    }

    /// List git references (branches and tags) of a repository.
    pub async fn git_references(
        &self,
        repository_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ScmGitReference>> {
        let response: ApiResponse<Vec<ScmGitReference>> = self
            .client
            .http
            .get_with_query(
                &format!("/v1/scmRepositories/{repository_id}/gitReferences"),
                &limit_query(limit),
            )
            .await?;
        Ok(response.data)
    }
}
