//! Products API for Xcode Cloud.

use crate::api::limit_query;
use crate::client::XcodeCloudClient;
use crate::error::Result;
use crate::types::{ApiResponse, CiProduct};

/// API for Xcode Cloud product operations.
pub struct ProductsApi<'a> {
    client: &'a XcodeCloudClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(client: &'a XcodeCloudClient) -> Self {
        Self { client }
    }

    /// List all Xcode Cloud products.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<CiProduct>> {
        let response: ApiResponse<Vec<CiProduct>> = self
            .client
            .http
            .get_with_query("/v1/ciProducts", &limit_query(limit))
            .await?;
        Ok(response.data)
    }

    /// Get a specific product by ID.
    pub async fn get(&self, product_id: &str) -> Result<CiProduct> {
        let response: ApiResponse<CiProduct> = self
            .client
            .http
            .get(&format!("/v1/ciProducts/{product_id}"))
            .await?;
        Ok(response.data)
    }
}
