//! Resource APIs for the App Store Connect Xcode Cloud endpoints.

mod artifacts;
mod builds;
mod macos_versions;
mod products;
mod repositories;
mod workflows;
mod xcode_versions;

pub use artifacts::{ArtifactsApi, BuildArtifacts};
pub use builds::{BuildWaitOutcome, BuildsApi, WaitOptions};
pub use macos_versions::MacOsVersionsApi;
pub use products::ProductsApi;
pub use repositories::RepositoriesApi;
pub use workflows::WorkflowsApi;
pub use xcode_versions::XcodeVersionsApi;

fn limit_query(limit: Option<u32>) -> Vec<(&'static str, String)> {
    limit.map(|n| ("limit", n.to_string())).into_iter().collect()
}
