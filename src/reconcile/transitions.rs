// ABOUTME: State transition methods for the create rollout.
// ABOUTME: Each method consumes self and returns the next state on success.

use snafu::ResultExt;
use tokio::time::Instant;

use crate::api::{AuthorizationOps, CloudFunctionApi, DeploymentOps, FunctionOps};
use crate::model::FunctionState;

use super::error::{
    CreateDeploymentSnafu, CreateFunctionSnafu, ResourceError, WaitDeploymentSnafu,
};
use super::parties::reconcile_parties;
use super::rollout::Rollout;
use super::state::{Authorized, Deployed, FunctionCreated, Planned};
use super::wait::DeploymentWaiter;

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Rollout<T>, (Rollout<S>, ResourceError)>;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Rollout<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Rollout<T> {
        Rollout {
            plan: self.plan,
            parent: self.parent,
            keep_failed_resource: self.keep_failed_resource,
            state,
        }
    }
}

// =============================================================================
// Planned -> FunctionCreated
// =============================================================================

impl Rollout<Planned> {
    /// Create the function version. Nothing exists to roll back on failure.
    pub async fn create_function<A>(self, api: &A) -> Result<Rollout<FunctionCreated>, ResourceError>
    where
        A: FunctionOps + ?Sized,
    {
        let function = api
            .create_function(self.parent.as_ref(), &self.plan.function)
            .await
            .context(CreateFunctionSnafu)?;

        tracing::info!(
            function_id = %function.id,
            version_id = %function.version_id,
            name = %function.name,
            "created function version"
        );

        Ok(self.transition(FunctionCreated { function }))
    }
}

// =============================================================================
// FunctionCreated -> Authorized
// =============================================================================

impl Rollout<FunctionCreated> {
    /// Reconcile invokers. A failure here leaves the version in place.
    pub async fn authorize<A>(self, api: &A) -> Result<Rollout<Authorized>, ResourceError>
    where
        A: AuthorizationOps + ?Sized,
    {
        let function = self.state.function.clone();
        let authorization = reconcile_parties(
            api,
            &function.id,
            &function.version_id,
            &self.plan.parties,
        )
        .await?;

        Ok(self.transition(Authorized {
            function,
            authorization,
        }))
    }
}

// =============================================================================
// Authorized -> Deployed
// =============================================================================

impl Rollout<Authorized> {
    /// Create the deployment and wait for it to become active.
    ///
    /// Without deployment specifications no request is sent.
    ///
    /// Returns `(self, error)` on failure to allow rollback.
    pub async fn deploy<A>(
        self,
        api: &A,
        waiter: &DeploymentWaiter,
        deadline: Instant,
    ) -> TransitionResult<Deployed, Authorized>
    where
        A: DeploymentOps + ?Sized,
    {
        let Some(specifications) = self.plan.deployment.as_ref() else {
            let Authorized {
                function,
                authorization,
            } = self.state.clone();
            return Ok(self.transition(Deployed {
                function,
                authorization,
                deployment: None,
            }));
        };

        let function_id = self.state.function.id.clone();
        let version_id = self.state.function.version_id.clone();

        let created = match api
            .create_deployment(&function_id, &version_id, specifications)
            .await
            .context(CreateDeploymentSnafu)
        {
            Ok(created) => created,
            Err(e) => return Err((self, e)),
        };

        let active = match waiter
            .wait(api, &function_id, &version_id, deadline)
            .await
            .context(WaitDeploymentSnafu)
        {
            Ok(active) => active,
            Err(e) => return Err((self, e)),
        };

        // The create response carries the submitted specifications; the
        // status is the one the waiter observed.
        let mut deployment = created;
        deployment.function_status = active.function_status;

        let Authorized {
            function,
            authorization,
        } = self.state.clone();
        Ok(self.transition(Deployed {
            function,
            authorization,
            deployment: Some(deployment),
        }))
    }

    /// Delete the version whose deployment failed, unless told to keep it.
    ///
    /// Returns the error to report: `cause` itself, or a
    /// [`ResourceError::Rollback`] when the cleanup failed as well.
    pub async fn rollback<A>(self, api: &A, cause: ResourceError) -> ResourceError
    where
        A: CloudFunctionApi + ?Sized,
    {
        let (function_id, version_id) = self.ids();
        tracing::error!(
            function_id = %function_id,
            version_id = %version_id,
            error = %cause,
            "failed to deploy the new version"
        );

        if self.keep_failed_resource {
            tracing::warn!(
                function_id = %function_id,
                version_id = %version_id,
                "keeping failed function version"
            );
            return cause;
        }

        match api.delete_function_version(function_id, version_id).await {
            Ok(()) => {
                tracing::info!(
                    function_id = %function_id,
                    version_id = %version_id,
                    "deleted the failed function version"
                );
                cause
            }
            Err(cleanup) => ResourceError::Rollback {
                version_id: version_id.clone(),
                source: Box::new(cause),
                cleanup,
            },
        }
    }
}

// =============================================================================
// Deployed -> FunctionState
// =============================================================================

impl Rollout<Deployed> {
    /// Merge everything created into `base`.
    pub fn finish(self, mut base: FunctionState) -> FunctionState {
        base.merge(
            &self.state.function,
            self.state.deployment.as_ref(),
            &self.state.authorization,
        );
        base
    }
}
