//! Wire types for the App Store Connect Xcode Cloud API.
//!
//! The upstream API speaks a JSON:API dialect: every payload is an envelope
//! of `{data, links?, meta?, included?}` and every resource nests its fields
//! under `attributes` with relationships referenced by `{type, id}` pairs.
//! Request envelopes are modelled as explicit structs rather than loose maps
//! so that partial-update semantics (omitted vs. null fields) are enforced at
//! the type level.

use serde::{Deserialize, Serialize};

/// Generic response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Reference to another resource, as used inside `relationships`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl ResourceRef {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Single-valued relationship wrapper (`{"data": {"type": ..., "id": ...}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub data: ResourceRef,
}

impl Relationship {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            data: ResourceRef::new(resource_type, id),
        }
    }
}

/// Multi-valued relationship wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipList {
    #[serde(default)]
    pub data: Vec<ResourceRef>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// An Xcode Cloud-enabled repository/project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiProduct {
    pub id: String,
    pub attributes: ProductAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<ProductRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributes {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_repositories: Option<RelationshipList>,
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

/// A named build/test/archive configuration owned by a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiWorkflow {
    pub id: String,
    pub attributes: WorkflowAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAttributes {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_locked_for_editing: bool,
    #[serde(default)]
    pub clean: bool,
    #[serde(default)]
    pub container_file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<CiAction>>,
}

/// One configured step (BUILD/TEST/ANALYZE/ARCHIVE) of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiAction {
    pub name: String,
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required_to_pass: Option<bool>,
    /// Known upstream quirk: the API has rejected `testConfig` as an unknown
    /// property on TEST actions. The shape is sent as-is regardless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_config: Option<TestConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Build,
    Test,
    Analyze,
    Archive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_plan_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_destinations: Option<Vec<TestDestination>>,
}

/// Simulator or device a TEST action runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDestination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Start condition for automatic builds on branch changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiBranchStartCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BranchPatterns>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_cancel: Option<bool>,
}

/// Start condition for manually started branch builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiManualBranchStartCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BranchPatterns>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPatterns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_match: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<BranchPattern>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPattern {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_prefix: Option<bool>,
}

// ---------------------------------------------------------------------------
// Build runs and actions
// ---------------------------------------------------------------------------

/// One execution instance of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiBuildRun {
    pub id: String,
    pub attributes: BuildRunAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRunAttributes {
    pub number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_commit: Option<Commit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_commit: Option<Commit>,
    #[serde(default)]
    pub is_pull_request_build: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_counts: Option<IssueCounts>,
    pub execution_progress: ExecutionProgress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_status: Option<CompletionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_reason: Option<String>,
}

/// Where in its lifecycle the upstream service reports a build to be.
/// Transitions are monotonic: PENDING -> RUNNING -> COMPLETE, though polling
/// snapshots may skip intermediate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionProgress {
    Pending,
    Running,
    Complete,
}

impl ExecutionProgress {
    /// COMPLETE is the only terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Outcome of a completed build or action. Only meaningful once
/// [`ExecutionProgress::Complete`] is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Succeeded,
    Failed,
    Errored,
    Canceled,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub commit_sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAuthor {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCounts {
    #[serde(default)]
    pub analyzer_warnings: u32,
    #[serde(default)]
    pub errors: u32,
    #[serde(default)]
    pub test_failures: u32,
    #[serde(default)]
    pub warnings: u32,
}

/// One step (build, test, analyze, archive) within a build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiBuildAction {
    pub id: String,
    pub attributes: BuildActionAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildActionAttributes {
    pub name: String,
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_counts: Option<IssueCounts>,
    pub execution_progress: ExecutionProgress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_status: Option<CompletionStatus>,
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// A downloadable file produced by a build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiArtifact {
    pub id: String,
    pub attributes: ArtifactAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactAttributes {
    pub file_name: String,
    pub file_type: ArtifactFileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Artifact tags as reported upstream. Tags added by Apple after this was
/// written land in `Other` rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactFileType {
    Log,
    Archive,
    XcodebuildArchive,
    ResultBundle,
    TestProducts,
    Screenshot,
    Video,
    #[serde(other)]
    Other,
}

// ---------------------------------------------------------------------------
// Xcode and macOS versions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiXcodeVersion {
    pub id: String,
    pub attributes: VersionAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiMacOsVersion {
    pub id: String,
    pub attributes: VersionAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionAttributes {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_destinations: Option<Vec<TestDestination>>,
}

// ---------------------------------------------------------------------------
// Repositories and git references
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScmRepository {
    pub id: String,
    pub attributes: RepositoryAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_clone_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_clone_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScmGitReference {
    pub id: String,
    pub attributes: GitReferenceAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitReferenceAttributes {
    pub name: String,
    #[serde(default)]
    pub canonical_name: String,
    #[serde(default)]
    pub is_deleted: bool,
    pub kind: GitReferenceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GitReferenceKind {
    Branch,
    Tag,
}

// ---------------------------------------------------------------------------
// Request envelopes
// ---------------------------------------------------------------------------

/// `POST /v1/ciBuildRuns` body.
#[derive(Debug, Clone, Serialize)]
pub struct StartBuildRunRequest {
    pub data: StartBuildRunData,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartBuildRunData {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub relationships: StartBuildRunRelationships,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBuildRunRelationships {
    pub workflow: Relationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_branch_or_tag: Option<Relationship>,
}

impl StartBuildRunRequest {
    pub fn new(workflow_id: &str, git_reference_id: Option<&str>) -> Self {
        Self {
            data: StartBuildRunData {
                resource_type: "ciBuildRuns",
                relationships: StartBuildRunRelationships {
                    workflow: Relationship::new("ciWorkflows", workflow_id),
                    source_branch_or_tag: git_reference_id
                        .map(|id| Relationship::new("scmGitReferences", id)),
                },
            },
        }
    }
}

/// Caller-facing parameters for creating a workflow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowParams {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub clean: Option<bool>,
    pub container_file_path: String,
    pub repository_id: String,
    pub xcode_version_id: String,
    pub mac_os_version_id: String,
    pub actions: Vec<CiAction>,
    #[serde(default)]
    pub branch_start_condition: Option<CiBranchStartCondition>,
    #[serde(default)]
    pub manual_branch_start_condition: Option<CiManualBranchStartCondition>,
}

/// `POST /v1/ciWorkflows` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateWorkflowRequest {
    pub data: CreateWorkflowData,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWorkflowData {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub attributes: CreateWorkflowAttributes,
    pub relationships: CreateWorkflowRelationships,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_enabled: bool,
    pub clean: bool,
    pub container_file_path: String,
    pub actions: Vec<CiAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_start_condition: Option<CiBranchStartCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_branch_start_condition: Option<CiManualBranchStartCondition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowRelationships {
    pub product: Relationship,
    pub repository: Relationship,
    pub xcode_version: Relationship,
    pub mac_os_version: Relationship,
}

impl CreateWorkflowRequest {
    pub fn new(product_id: &str, params: CreateWorkflowParams) -> Self {
        Self {
            data: CreateWorkflowData {
                resource_type: "ciWorkflows",
                attributes: CreateWorkflowAttributes {
                    name: params.name,
                    description: params.description,
                    is_enabled: params.is_enabled.unwrap_or(true),
                    clean: params.clean.unwrap_or(false),
                    container_file_path: params.container_file_path,
                    actions: params.actions,
                    branch_start_condition: params.branch_start_condition,
                    manual_branch_start_condition: params.manual_branch_start_condition,
                },
                relationships: CreateWorkflowRelationships {
                    product: Relationship::new("ciProducts", product_id),
                    repository: Relationship::new("scmRepositories", params.repository_id),
                    xcode_version: Relationship::new("ciXcodeVersions", params.xcode_version_id),
                    mac_os_version: Relationship::new("ciMacOsVersions", params.mac_os_version_id),
                },
            },
        }
    }
}

/// Caller-facing parameters for a partial workflow update. Fields left as
/// `None` are omitted from the PATCH body and remain untouched server-side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub clean: Option<bool>,
    #[serde(default)]
    pub container_file_path: Option<String>,
    #[serde(default)]
    pub actions: Option<Vec<CiAction>>,
    /// `Some(None)` serializes an explicit `null`, which clears the start
    /// condition upstream; `None` omits the field entirely.
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub branch_start_condition: Option<Option<CiBranchStartCondition>>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub manual_branch_start_condition: Option<Option<CiManualBranchStartCondition>>,
    #[serde(default)]
    pub xcode_version_id: Option<String>,
    #[serde(default)]
    pub mac_os_version_id: Option<String>,
}

/// Maps a present-but-null JSON field to `Some(None)` so callers can clear
/// composite fields, while an absent field stays `None`.
fn deserialize_clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// `PATCH /v1/ciWorkflows/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateWorkflowRequest {
    pub data: UpdateWorkflowData,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateWorkflowData {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<UpdateWorkflowAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<UpdateWorkflowRelationships>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<CiAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_start_condition: Option<Option<CiBranchStartCondition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_branch_start_condition: Option<Option<CiManualBranchStartCondition>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowRelationships {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcode_version: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_os_version: Option<Relationship>,
}

impl UpdateWorkflowRequest {
    /// Build a partial-patch body. The `attributes` and `relationships`
    /// objects are present only when at least one of their fields was
    /// supplied.
    pub fn new(workflow_id: &str, params: UpdateWorkflowParams) -> Self {
        let attributes = UpdateWorkflowAttributes {
            name: params.name,
            description: params.description,
            is_enabled: params.is_enabled,
            clean: params.clean,
            container_file_path: params.container_file_path,
            actions: params.actions,
            branch_start_condition: params.branch_start_condition,
            manual_branch_start_condition: params.manual_branch_start_condition,
        };
        let has_attributes = attributes.name.is_some()
            || attributes.description.is_some()
            || attributes.is_enabled.is_some()
            || attributes.clean.is_some()
            || attributes.container_file_path.is_some()
            || attributes.actions.is_some()
            || attributes.branch_start_condition.is_some()
            || attributes.manual_branch_start_condition.is_some();

        let relationships = UpdateWorkflowRelationships {
            xcode_version: params
                .xcode_version_id
                .map(|id| Relationship::new("ciXcodeVersions", id)),
            mac_os_version: params
                .mac_os_version_id
                .map(|id| Relationship::new("ciMacOsVersions", id)),
        };
        let has_relationships =
            relationships.xcode_version.is_some() || relationships.mac_os_version.is_some();

        Self {
            data: UpdateWorkflowData {
                resource_type: "ciWorkflows",
                id: workflow_id.to_string(),
                attributes: has_attributes.then_some(attributes),
                relationships: has_relationships.then_some(relationships),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_progress_wire_names() {
        assert_eq!(
            serde_json::to_string(&ExecutionProgress::Pending).unwrap(),
            "\"PENDING\""
        );
        let parsed: ExecutionProgress = serde_json::from_str("\"COMPLETE\"").unwrap();
        assert!(parsed.is_terminal());
    }

    #[test]
    fn test_unknown_artifact_tag_maps_to_other() {
        let parsed: ArtifactFileType = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(parsed, ArtifactFileType::Other);
    }

    #[test]
    fn test_start_build_request_without_git_reference() {
        let request = StartBuildRunRequest::new("wf-1", None);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["data"]["type"], "ciBuildRuns");
        assert_eq!(
            json["data"]["relationships"]["workflow"]["data"]["id"],
            "wf-1"
        );
        assert!(json["data"]["relationships"]
            .get("sourceBranchOrTag")
            .is_none());
    }

    #[test]
    fn test_start_build_request_with_git_reference() {
        let request = StartBuildRunRequest::new("wf-1", Some("ref-9"));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["data"]["relationships"]["sourceBranchOrTag"]["data"]["type"],
            "scmGitReferences"
        );
        assert_eq!(
            json["data"]["relationships"]["sourceBranchOrTag"]["data"]["id"],
            "ref-9"
        );
    }

    #[test]
    fn test_partial_update_contains_only_supplied_attributes() {
        let request = UpdateWorkflowRequest::new(
            "wf-2",
            UpdateWorkflowParams {
                name: Some("X".to_string()),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&request).unwrap();

        let attributes = json["data"]["attributes"].as_object().unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes["name"], "X");
        // No relationships supplied: the object must be absent, not empty.
        assert!(json["data"].get("relationships").is_none());
    }

    #[test]
    fn test_update_with_no_fields_omits_both_objects() {
        let request = UpdateWorkflowRequest::new("wf-3", UpdateWorkflowParams::default());
        let json = serde_json::to_value(&request).unwrap();

        assert!(json["data"].get("attributes").is_none());
        assert!(json["data"].get("relationships").is_none());
        assert_eq!(json["data"]["id"], "wf-3");
    }

    #[test]
    fn test_update_relationships_only() {
        let request = UpdateWorkflowRequest::new(
            "wf-4",
            UpdateWorkflowParams {
                xcode_version_id: Some("xcode-16".to_string()),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&request).unwrap();

        assert!(json["data"].get("attributes").is_none());
        assert_eq!(
            json["data"]["relationships"]["xcodeVersion"]["data"]["id"],
            "xcode-16"
        );
        assert!(json["data"]["relationships"].get("macOsVersion").is_none());
    }

    #[test]
    fn test_explicit_null_clears_start_condition() {
        let request = UpdateWorkflowRequest::new(
            "wf-5",
            UpdateWorkflowParams {
                branch_start_condition: Some(None),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&request).unwrap();

        let attributes = json["data"]["attributes"].as_object().unwrap();
        assert!(attributes.contains_key("branchStartCondition"));
        assert!(attributes["branchStartCondition"].is_null());
    }

    #[test]
    fn test_create_workflow_request_envelope() {
        let params = CreateWorkflowParams {
            name: "CI".to_string(),
            description: Some("CI workflow".to_string()),
            is_enabled: None,
            clean: None,
            container_file_path: "App.xcodeproj".to_string(),
            repository_id: "repo-1".to_string(),
            xcode_version_id: "xcode-16".to_string(),
            mac_os_version_id: "macos-15".to_string(),
            actions: vec![CiAction {
                name: "Build".to_string(),
                action_type: ActionType::Build,
                destination: Some("ANY_IOS_SIMULATOR".to_string()),
                platform: Some("IOS".to_string()),
                scheme: Some("App".to_string()),
                is_required_to_pass: None,
                test_config: None,
            }],
            branch_start_condition: None,
            manual_branch_start_condition: None,
        };
        let json = serde_json::to_value(CreateWorkflowRequest::new("prod-1", params)).unwrap();

        assert_eq!(json["data"]["relationships"]["product"]["data"]["id"], "prod-1");
        assert_eq!(json["data"]["relationships"]["repository"]["data"]["id"], "repo-1");
        assert_eq!(
            json["data"]["relationships"]["xcodeVersion"]["data"]["id"],
            "xcode-16"
        );
        assert_eq!(
            json["data"]["relationships"]["macOsVersion"]["data"]["id"],
            "macos-15"
        );
        assert_eq!(json["data"]["attributes"]["isEnabled"], true);
        assert_eq!(json["data"]["attributes"]["clean"], false);
        assert_eq!(json["data"]["attributes"]["actions"][0]["actionType"], "BUILD");
    }

    #[test]
    fn test_build_run_deserializes_minimal_payload() {
        let json = r#"{
            "id": "build-123",
            "attributes": {
                "number": 7,
                "executionProgress": "RUNNING",
                "isPullRequestBuild": false
            }
        }"#;
        let run: CiBuildRun = serde_json::from_str(json).unwrap();

        assert_eq!(run.id, "build-123");
        assert_eq!(run.attributes.number, 7);
        assert_eq!(run.attributes.execution_progress, ExecutionProgress::Running);
        assert!(run.attributes.completion_status.is_none());
    }
}
