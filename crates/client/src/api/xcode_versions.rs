//! Xcode versions API.

use crate::api::limit_query;
use crate::client::XcodeCloudClient;
use crate::error::Result;
use crate::types::{ApiResponse, CiMacOsVersion, CiXcodeVersion};

/// API for the Xcode versions available to Xcode Cloud.
pub struct XcodeVersionsApi<'a> {
    client: &'a XcodeCloudClient,
}

impl<'a> XcodeVersionsApi<'a> {
    pub(crate) fn new(client: &'a XcodeCloudClient) -> Self {
        Self { client }
    }

    /// List all available Xcode versions.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<CiXcodeVersion>> {
        let response: ApiResponse<Vec<CiXcodeVersion>> = self
            .client
            .http
            .get_with_query("/v1/ciXcodeVersions", &limit_query(limit))
            .await?;
        Ok(response.data)
    }

    /// Get a specific Xcode version by ID.
    pub async fn get(&self, xcode_version_id: &str) -> Result<CiXcodeVersion> {
        let response: ApiResponse<CiXcodeVersion> = self
            .client
            .http
            .get(&format!("/v1/ciXcodeVersions/{xcode_version_id}"))
            .await?;
        Ok(response.data)
    }

    /// List macOS versions compatible with a specific Xcode version.
    pub async fn macos_versions(
        &self,
        xcode_version_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<CiMacOsVersion>> {
        let response: ApiResponse<Vec<CiMacOsVersion>> = self
            .client
            .http
            .get_with_query(
                &format!("/v1/ciXcodeVersions/{xcode_version_id}/macOsVersions"),
                &limit_query(limit),
            )
            .await?;
        Ok(response.data)
    }
}
