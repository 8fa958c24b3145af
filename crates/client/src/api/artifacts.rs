//! Artifacts API for Xcode Cloud build runs.

use bytes::Bytes;
use serde::Serialize;

use crate::client::XcodeCloudClient;
use crate::error::Result;
use crate::types::{ApiResponse, ArtifactFileType, CiArtifact};

/// Artifacts of a build run, bucketed by file type.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildArtifacts {
    pub logs: Vec<CiArtifact>,
    pub archives: Vec<CiArtifact>,
    pub screenshots: Vec<CiArtifact>,
    pub videos: Vec<CiArtifact>,
    pub result_bundles: Vec<CiArtifact>,
    pub test_products: Vec<CiArtifact>,
    pub other: Vec<CiArtifact>,
}

impl BuildArtifacts {
    /// Bucket artifacts by their upstream file-type tag. Both archive tags
    /// land in `archives`; unrecognized tags land in `other`.
    pub fn classify(artifacts: Vec<CiArtifact>) -> Self {
        let mut result = Self::default();
        for artifact in artifacts {
            match artifact.attributes.file_type {
                ArtifactFileType::Log => result.logs.push(artifact),
                ArtifactFileType::Archive | ArtifactFileType::XcodebuildArchive => {
                    result.archives.push(artifact)
                }
                ArtifactFileType::Screenshot => result.screenshots.push(artifact),
                ArtifactFileType::Video => result.videos.push(artifact),
                ArtifactFileType::ResultBundle => result.result_bundles.push(artifact),
                ArtifactFileType::TestProducts => result.test_products.push(artifact),
                ArtifactFileType::Other => result.other.push(artifact),
            }
        }
        result
    }
}

/// API for Xcode Cloud artifact operations.
pub struct ArtifactsApi<'a> {
    client: &'a XcodeCloudClient,
}

impl<'a> ArtifactsApi<'a> {
    pub(crate) fn new(client: &'a XcodeCloudClient) -> Self {
        Self { client }
    }

    /// Get all artifacts for a build run, organized by type.
    pub async fn list_for_build_run(&self, build_run_id: &str) -> Result<BuildArtifacts> {
        let response: ApiResponse<Vec<CiArtifact>> = self
            .client
            .http
            .get(&format!("/v1/ciBuildRuns/{build_run_id}/artifacts"))
            .await?;
        Ok(BuildArtifacts::classify(response.data))
    }

    /// Download an artifact from its pre-signed URL.
    pub async fn download(&self, url: &str) -> Result<Bytes> {
        self.client.http.download(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::test_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn artifact(id: &str, file_name: &str, file_type: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "attributes": {
                "fileName": file_name,
                "fileType": file_type,
                "fileSize": 1024,
                "downloadUrl": format!("https://cdn.example.com/{id}")
            }
        })
    }

    #[test]
    fn test_classification_buckets() {
        let artifacts: Vec<CiArtifact> = serde_json::from_value(serde_json::json!([
            artifact("a1", "build.log", "LOG"),
            artifact("a2", "App.xcarchive", "ARCHIVE"),
            artifact("a3", "App2.xcarchive", "XCODEBUILD_ARCHIVE"),
            artifact("a4", "shot.png", "SCREENSHOT"),
            artifact("a5", "run.mp4", "VIDEO"),
            artifact("a6", "tests.xcresult", "RESULT_BUNDLE"),
            artifact("a7", "tests.zip", "TEST_PRODUCTS"),
            artifact("a8", "mystery.bin", "SOMETHING_NEW"),
        ]))
        .unwrap();

        let classified = BuildArtifacts::classify(artifacts);

        assert_eq!(classified.logs.len(), 1);
        assert_eq!(classified.archives.len(), 2);
        assert_eq!(classified.screenshots.len(), 1);
        assert_eq!(classified.videos.len(), 1);
        assert_eq!(classified.result_bundles.len(), 1);
        assert_eq!(classified.test_products.len(), 1);
        assert_eq!(classified.other.len(), 1);
        assert_eq!(classified.other[0].attributes.file_name, "mystery.bin");
    }

    #[test]
    fn test_classified_serialization_uses_camel_case() {
        let json = serde_json::to_value(BuildArtifacts::default()).unwrap();

        assert!(json.get("resultBundles").is_some());
        assert!(json.get("testProducts").is_some());
    }

    #[tokio::test]
    async fn test_list_for_build_run() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/ciBuildRuns/build-1/artifacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    artifact("a1", "build.log", "LOG"),
                    artifact("a2", "App.xcarchive", "ARCHIVE"),
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let artifacts = client
            .artifacts()
            .list_for_build_run("build-1")
            .await
            .unwrap();

        assert_eq!(artifacts.logs.len(), 1);
        assert_eq!(artifacts.archives.len(), 1);
        assert!(artifacts.other.is_empty());
    }
}
