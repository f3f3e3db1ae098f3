// ABOUTME: Polls a deployment until it reaches a terminal status or the deadline.
// ABOUTME: Never sleeps past the deadline; any non-ACTIVE terminal status fails at once.

use std::time::Duration;
use tokio::time::Instant;

use crate::api::{ApiError, Deployment, DeploymentOps, FunctionStatus};
use crate::config::default_poll_interval;
use crate::types::{FunctionId, VersionId};

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("deployment of {function_id}/{version_id} reached unexpected status {status}")]
    Failed {
        function_id: FunctionId,
        version_id: VersionId,
        status: FunctionStatus,
    },

    #[error("deployment of {function_id}/{version_id} disappeared while waiting for it")]
    Missing {
        function_id: FunctionId,
        version_id: VersionId,
    },

    #[error(
        "timed out after {}s waiting for the deployment to become ACTIVE",
        .timeout.as_secs()
    )]
    Timeout { timeout: Duration },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Stand-in deadline for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// The instant `timeout` from now, clamped when the addition would overflow.
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Fixed-interval poller for deployment completion.
#[derive(Debug, Clone, Copy)]
pub struct DeploymentWaiter {
    poll_interval: Duration,
}

impl Default for DeploymentWaiter {
    fn default() -> Self {
        Self::new(default_poll_interval())
    }
}

impl DeploymentWaiter {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll until `ACTIVE` (returned) or failure.
    ///
    /// A status read is always attempted at least once, even when the
    /// deadline has already passed.
    pub async fn wait<A>(
        &self,
        api: &A,
        function: &FunctionId,
        version: &VersionId,
        deadline: Instant,
    ) -> Result<Deployment, WaitError>
    where
        A: DeploymentOps + ?Sized,
    {
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            polls += 1;
            let deployment = api
                .read_deployment(function, version)
                .await?
                .ok_or_else(|| WaitError::Missing {
                    function_id: function.clone(),
                    version_id: version.clone(),
                })?;

            match &deployment.function_status {
                FunctionStatus::Active => {
                    tracing::info!(
                        function_id = %function,
                        version_id = %version,
                        polls,
                        "deployment active"
                    );
                    return Ok(deployment);
                }
                FunctionStatus::Deploying => {
                    tracing::debug!(
                        function_id = %function,
                        version_id = %version,
                        polls,
                        "deployment still deploying"
                    );
                }
                other => {
                    tracing::error!(
                        function_id = %function,
                        version_id = %version,
                        status = %other,
                        "deployment failed"
                    );
                    return Err(WaitError::Failed {
                        function_id: function.clone(),
                        version_id: version.clone(),
                        status: other.clone(),
                    });
                }
            }

            let timed_out = WaitError::Timeout {
                timeout: deadline.saturating_duration_since(started),
            };
            if Instant::now() >= deadline {
                return Err(timed_out);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = tokio::time::sleep_until(deadline) => return Err(timed_out),
            }
        }
    }
}
