// ABOUTME: The cloud function resource: create, read, update, delete, import, apply.
// ABOUTME: Drives the client through the rollout and maps responses into state.

use std::sync::Arc;

use snafu::ResultExt;

use crate::api::{CloudFunctionApi, FunctionAuthorization};
use crate::config::FunctionSpec;
use crate::model::{CreatePlan, FunctionState, UpdatePlan};
use crate::types::{FunctionId, ImportId, VersionId};

use super::error::{
    CreateDeploymentSnafu, DeleteDeploymentSnafu, DeleteFunctionSnafu, GetFunctionSnafu,
    ImportSnafu, ListAuthorizationSnafu, ReadDeploymentSnafu, ReplaceSnafu, ResourceError,
    UpdateDeploymentSnafu, UpdateTagsSnafu, ValidationSnafu, VersionNotFoundSnafu,
    WaitDeploymentSnafu,
};
use super::parties::reconcile_parties;
use super::policy::{ChangePlan, PlannedAction};
use super::rollout::Rollout;
use super::wait::{DeploymentWaiter, deadline_after};

/// Result of [`CloudFunctionResource::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub action: PlannedAction,
    pub changed_fields: Vec<&'static str>,
    pub state: FunctionState,
}

/// Lifecycle operations for one cloud function version.
pub struct CloudFunctionResource<A: ?Sized> {
    api: Arc<A>,
    waiter: DeploymentWaiter,
}

impl<A: ?Sized> Clone for CloudFunctionResource<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            waiter: self.waiter,
        }
    }
}

impl<A> CloudFunctionResource<A>
where
    A: CloudFunctionApi + ?Sized,
{
    pub fn new(api: Arc<A>, waiter: DeploymentWaiter) -> Self {
        Self { api, waiter }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create the function version, authorize invokers, deploy, and wait.
    ///
    /// A failed deployment deletes the new version unless
    /// `keep_failed_resource` is set.
    pub async fn create(&self, desired: &FunctionSpec) -> Result<FunctionState, ResourceError> {
        let plan = CreatePlan::build(desired).context(ValidationSnafu)?;
        self.create_planned(desired, plan).await
    }

    async fn create_planned(
        &self,
        desired: &FunctionSpec,
        plan: CreatePlan,
    ) -> Result<FunctionState, ResourceError> {
        let deadline = deadline_after(desired.timeouts.create());
        let api = self.api.as_ref();

        let rollout = Rollout::new(
            plan,
            desired.function_id.clone(),
            desired.keep_failed_resource,
        );
        let rollout = rollout.create_function(api).await?;
        let rollout = rollout.authorize(api).await?;

        match rollout.deploy(api, &self.waiter, deadline).await {
            Ok(deployed) => Ok(deployed.finish(FunctionState::planned(desired))),
            Err((authorized, cause)) => Err(authorized.rollback(api, cause).await),
        }
    }

    /// Refresh `prior` from the control plane. `None` means the version is gone.
    pub async fn read(&self, prior: &FunctionState) -> Result<Option<FunctionState>, ResourceError> {
        let api = self.api.as_ref();
        let (function_id, version_id) = (&prior.function_id, &prior.version_id);

        let function = match api.get_function_version(function_id, version_id).await {
            Ok(function) => function,
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    function_id = %function_id,
                    version_id = %version_id,
                    "cloud function version no longer exists, removing from state"
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(e).context(GetFunctionSnafu {
                    function_id: function_id.clone(),
                    version_id: version_id.clone(),
                });
            }
        };

        let deployment = api
            .read_deployment(function_id, version_id)
            .await
            .context(ReadDeploymentSnafu)?;

        let authorization = api
            .get_authorization(function_id, version_id)
            .await
            .context(ListAuthorizationSnafu)?;

        let mut state = prior.clone();
        state.merge(&function, deployment.as_ref(), &authorization);
        Ok(Some(state))
    }

    /// Apply in-place changes from `desired` to the version in `prior`.
    ///
    /// A failed deployment update leaves the version in place.
    pub async fn update(
        &self,
        desired: &FunctionSpec,
        prior: &FunctionState,
    ) -> Result<FunctionState, ResourceError> {
        let plan = UpdatePlan::build(desired).context(ValidationSnafu)?;
        let deadline = deadline_after(desired.timeouts.update());
        let api = self.api.as_ref();
        let (function_id, version_id) = (&prior.function_id, &prior.version_id);

        if desired.tags != prior.tags {
            api.update_function_tags(function_id, version_id, &plan.tags)
                .await
                .context(UpdateTagsSnafu)?;
        }

        let function = api
            .get_function_version(function_id, version_id)
            .await
            .context(GetFunctionSnafu {
                function_id: function_id.clone(),
                version_id: version_id.clone(),
            })?;

        let authorization: FunctionAuthorization =
            reconcile_parties(api, &function.id, &function.version_id, &plan.parties).await?;

        let deployment = match &plan.deployment {
            None => {
                match api.delete_deployment(function_id, version_id).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {
                        tracing::debug!(
                            function_id = %function_id,
                            version_id = %version_id,
                            "no deployment to delete"
                        );
                    }
                    Err(e) => {
                        return Err(e).context(DeleteDeploymentSnafu {
                            version_id: version_id.clone(),
                        });
                    }
                }
                None
            }
            Some(specifications) => {
                let submitted = if prior.deployment_specifications.is_empty() {
                    api.create_deployment(function_id, version_id, specifications)
                        .await
                        .context(CreateDeploymentSnafu)?
                } else {
                    api.update_deployment(function_id, version_id, specifications)
                        .await
                        .context(UpdateDeploymentSnafu)?
                };

                let active = self
                    .waiter
                    .wait(api, function_id, version_id, deadline)
                    .await
                    .context(WaitDeploymentSnafu)?;

                let mut deployment = submitted;
                deployment.function_status = active.function_status;
                Some(deployment)
            }
        };

        let mut state = FunctionState::planned(desired);
        state.function_id = prior.function_id.clone();
        state.version_id = prior.version_id.clone();
        state.nca_id = prior.nca_id.clone();
        state.merge(&function, deployment.as_ref(), &authorization);
        Ok(state)
    }

    /// Delete the version. The control plane removes its deployment.
    pub async fn delete(&self, prior: &FunctionState) -> Result<(), ResourceError> {
        self.api
            .delete_function_version(&prior.function_id, &prior.version_id)
            .await
            .context(DeleteFunctionSnafu {
                version_id: prior.version_id.clone(),
            })?;

        tracing::info!(
            function_id = %prior.function_id,
            version_id = %prior.version_id,
            "deleted function version"
        );
        Ok(())
    }

    /// Delete the version being replaced. A version that is already gone
    /// counts as deleted.
    async fn delete_replaced(&self, prior: &FunctionState) -> Result<(), ResourceError> {
        match self
            .api
            .delete_function_version(&prior.function_id, &prior.version_id)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    function_id = %prior.function_id,
                    version_id = %prior.version_id,
                    "deleted function version for replacement"
                );
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    function_id = %prior.function_id,
                    version_id = %prior.version_id,
                    "version to replace no longer exists"
                );
                Ok(())
            }
            Err(e) => Err(e).context(DeleteFunctionSnafu {
                version_id: prior.version_id.clone(),
            }),
        }
    }

    /// Adopt an existing version from a `"function_id,version_id"` identifier.
    pub async fn import(&self, id: &str) -> Result<FunctionState, ResourceError> {
        let ImportId {
            function_id,
            version_id,
        } = ImportId::parse(id).context(ImportSnafu)?;

        self.import_ids(function_id, version_id).await
    }

    async fn import_ids(
        &self,
        function_id: FunctionId,
        version_id: VersionId,
    ) -> Result<FunctionState, ResourceError> {
        let placeholder = FunctionState::imported(function_id.clone(), version_id.clone());
        self.read(&placeholder).await?.ok_or_else(|| {
            VersionNotFoundSnafu {
                function_id,
                version_id,
            }
            .build()
        })
    }

    /// Compare `desired` with `prior` without touching the control plane.
    pub fn plan(&self, desired: &FunctionSpec, prior: Option<&FunctionState>) -> ChangePlan {
        ChangePlan::between(desired, prior)
    }

    /// Converge on `desired`: create, update in place, replace, or nothing.
    ///
    /// Replacement deletes the old version before creating the new one.
    /// Request bodies are validated before anything is deleted. A create that
    /// fails after the delete surfaces as [`ResourceError::Replace`].
    pub async fn apply(
        &self,
        desired: &FunctionSpec,
        prior: Option<&FunctionState>,
    ) -> Result<ApplyOutcome, ResourceError> {
        let change = ChangePlan::between(desired, prior);
        let action = change.action();
        let changed_fields = change.changed_fields().to_vec();
        tracing::info!(%action, changed = ?changed_fields, "planned apply");

        let state = match (action, prior) {
            (PlannedAction::NoOp, Some(prior)) => {
                let mut state = prior.clone();
                state.secret_names = desired.secret_names();
                state
            }
            (PlannedAction::UpdateInPlace, Some(prior)) => self.update(desired, prior).await?,
            (PlannedAction::Replace, Some(prior)) => {
                let plan = CreatePlan::build(desired).context(ValidationSnafu)?;
                self.delete_replaced(prior).await?;
                self.create_planned(desired, plan)
                    .await
                    .map_err(Box::new)
                    .context(ReplaceSnafu {
                        version_id: prior.version_id.clone(),
                    })?
            }
            _ => self.create(desired).await?,
        };

        Ok(ApplyOutcome {
            action,
            changed_fields,
            state,
        })
    }
}
