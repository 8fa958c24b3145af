//! macOS versions API.

use crate::api::limit_query;
use crate::client::XcodeCloudClient;
use crate::error::Result;
use crate::types::{ApiResponse, CiMacOsVersion, CiXcodeVersion};

/// API for the macOS versions available to Xcode Cloud.
pub struct MacOsVersionsApi<'a> {
    client: &'a XcodeCloudClient,
}

impl<'a> MacOsVersionsApi<'a> {
    pub(crate) fn new(client: &'a XcodeCloudClient) -> Self {
        Self { client }
    }

    /// List all available macOS versions.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<CiMacOsVersion>> {
        let response: ApiResponse<Vec<CiMacOsVersion>> = self
            .client
            .http
            .get_with_query("/v1/ciMacOsVersions", &limit_query(limit))
            .await?;
        Ok(response.data)
    }

    /// Get a specific macOS version by ID.
    pub async fn get(&self, macos_version_id: &str) -> Result<CiMacOsVersion> {
        let response: ApiResponse<CiMacOsVersion> = self
            .client
            .http
            .get(&format!("/v1/ciMacOsVersions/{macos_version_id}"))
            .await?;
        Ok(response.data)
    }

    /// List Xcode versions compatible with a specific macOS version.
    pub async fn xcode_versions(
        &self,
        macos_version_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<CiXcodeVersion>> {
        let response: ApiResponse<Vec<CiXcodeVersion>> = self
            .client
            .http
            .get_with_query(
                &format!("/v1/ciMacOsVersions/{macos_version_id}/xcodeVersions"),
                &limit_query(limit),
            )
            .await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::test_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_macos_versions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciMacOsVersions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "macos-15",
                    "attributes": {"name": "macOS Sequoia", "version": "15.0"}
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let versions = client.macos_versions().list(None).await.unwrap();

        assert_eq!(versions[0].attributes.name, "macOS Sequoia");
    }
}
