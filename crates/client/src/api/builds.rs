//! Builds API for Xcode Cloud, including the start-and-wait poll loop.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::api::limit_query;
use crate::client::XcodeCloudClient;
use crate::error::{Error, Result};
use crate::types::{ApiResponse, CiBuildAction, CiBuildRun, StartBuildRunRequest};

/// Consecutive poll failures tolerated before the wait loop gives up.
const MAX_CONSECUTIVE_POLL_ERRORS: u32 = 3;

/// Pacing and deadline for [`BuildsApi::start_and_wait`].
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Total time to wait before giving up on completion.
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Result of waiting for a build. A deadline overrun is reported here rather
/// than as an error: the build is still running upstream and its last
/// observed snapshot is useful.
#[derive(Debug, Clone)]
pub struct BuildWaitOutcome {
    /// Last observed build snapshot.
    pub build: CiBuildRun,
    /// True when the deadline elapsed before the build reached COMPLETE.
    pub timed_out: bool,
    /// Wall-clock time spent waiting, in milliseconds.
    pub total_duration_ms: u64,
    /// Number of status polls issued after the initial start.
    pub poll_count: u32,
}

/// API for Xcode Cloud build run operations.
pub struct BuildsApi<'a> {
    client: &'a XcodeCloudClient,
}

impl<'a> BuildsApi<'a> {
    pub(crate) fn new(client: &'a XcodeCloudClient) -> Self {
        Self { client }
    }

    /// Start a new build for a workflow. With no git reference the workflow's
    /// default branch is built.
    pub async fn start(
        &self,
        workflow_id: &str,
        git_reference_id: Option<&str>,
    ) -> Result<CiBuildRun> {
        let request = StartBuildRunRequest::new(workflow_id, git_reference_id);
        let response: ApiResponse<CiBuildRun> =
            self.client.http.post("/v1/ciBuildRuns", &request).await?;
        Ok(response.data)
    }

    /// Cancel a running build. Only PENDING or RUNNING builds can be
    /// canceled.
    pub async fn cancel(&self, build_run_id: &str) -> Result<()> {
        self.client
            .http
            .delete(&format!("/v1/ciBuildRuns/{build_run_id}"))
            .await
    }

    /// Get a specific build run by ID.
    pub async fn get(&self, build_run_id: &str) -> Result<CiBuildRun> {
        let response: ApiResponse<CiBuildRun> = self
            .client
            .http
            .get(&format!("/v1/ciBuildRuns/{build_run_id}"))
            .await?;
        Ok(response.data)
    }

    /// List build runs for a workflow.
    pub async fn list_for_workflow(
        &self,
        workflow_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<CiBuildRun>> {
        let response: ApiResponse<Vec<CiBuildRun>> = self
            .client
            .http
            .get_with_query(
                &format!("/v1/ciWorkflows/{workflow_id}/buildRuns"),
                &limit_query(limit),
            )
            .await?;
        Ok(response.data)
    }

    /// Get the per-step actions of a build run.
    pub async fn actions(&self, build_run_id: &str) -> Result<Vec<CiBuildAction>> {
        let response: ApiResponse<Vec<CiBuildAction>> = self
            .client
            .http
            .get(&format!("/v1/ciBuildRuns/{build_run_id}/actions"))
            .await?;
        Ok(response.data)
    }

    /// Start a build and poll until it reaches COMPLETE or the deadline
    /// elapses.
    ///
    /// The deadline is checked before each sleep, so the loop never sleeps
    /// past an already-expired deadline. Transient poll failures are retried
    /// in place; [`MAX_CONSECUTIVE_POLL_ERRORS`] failures in a row abort the
    /// wait with [`Error::PollAborted`]. A successful poll resets the
    /// failure counter.
    pub async fn start_and_wait(
        &self,
        workflow_id: &str,
        git_reference_id: Option<&str>,
        options: WaitOptions,
    ) -> Result<BuildWaitOutcome> {
        let build = self.start(workflow_id, git_reference_id).await?;
        let build_run_id = build.id.clone();
        let started = Instant::now();

        let mut current = build;
        let mut poll_count: u32 = 0;
        let mut consecutive_errors: u32 = 0;

        while !current.attributes.execution_progress.is_terminal() {
            if started.elapsed() > options.timeout {
                warn!(
                    build_run_id = %build_run_id,
                    poll_count,
                    "deadline elapsed before build completion"
                );
                return Ok(BuildWaitOutcome {
                    build: current,
                    timed_out: true,
                    total_duration_ms: started.elapsed().as_millis() as u64,
                    poll_count,
                });
            }

            tokio::time::sleep(options.poll_interval).await;
            poll_count += 1;

            match self.get(&build_run_id).await {
                Ok(build) => {
                    debug!(
                        build_run_id = %build_run_id,
                        progress = ?build.attributes.execution_progress,
                        poll_count,
                        "polled build status"
                    );
                    current = build;
                    consecutive_errors = 0;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    warn!(
                        build_run_id = %build_run_id,
                        consecutive_errors,
                        error = %e,
                        "build status poll failed"
                    );
                    if consecutive_errors >= MAX_CONSECUTIVE_POLL_ERRORS {
                        return Err(Error::PollAborted {
                            attempts: consecutive_errors,
                            last_error: e.to_string(),
                        });
                    }
                }
            }
        }

        Ok(BuildWaitOutcome {
            build: current,
            timed_out: false,
            total_duration_ms: started.elapsed().as_millis() as u64,
            poll_count,
        })
    }
}
