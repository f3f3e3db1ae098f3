// ABOUTME: Lifecycle error types with SNAFU context selectors.
// ABOUTME: Every failure names the operation that failed and carries its cause.

use snafu::Snafu;

use super::wait::WaitError;
use crate::api::{ApiError, ApiErrorKind};
use crate::model::ValidationError;
use crate::types::{FunctionId, ImportIdError, VersionId};

/// A failed lifecycle operation on a cloud function.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ResourceError {
    #[snafu(display("invalid desired state: {source}"))]
    Validation { source: ValidationError },

    #[snafu(display("{source}"))]
    Import { source: ImportIdError },

    #[snafu(display("failed to create cloud function: {source}"))]
    CreateFunction { source: ApiError },

    #[snafu(display("failed to get cloud function version {function_id}/{version_id}: {source}"))]
    GetFunction {
        function_id: FunctionId,
        version_id: VersionId,
        source: ApiError,
    },

    #[snafu(display("failed to list versions of cloud function {function_id}: {source}"))]
    ListVersions {
        function_id: FunctionId,
        source: ApiError,
    },

    #[snafu(display("version {version_id} of cloud function {function_id} not found"))]
    VersionNotFound {
        function_id: FunctionId,
        version_id: VersionId,
    },

    #[snafu(display("failed to update function tags: {source}"))]
    UpdateTags { source: ApiError },

    #[snafu(display("failed to list authorized parties: {source}"))]
    ListAuthorization { source: ApiError },

    #[snafu(display("failed to authorize additional accounts to invoke function: {source}"))]
    Authorize { source: ApiError },

    #[snafu(display("failed to unauthorize additional accounts to invoke function: {source}"))]
    Unauthorize { source: ApiError },

    #[snafu(display("failed to create cloud function deployment: {source}"))]
    CreateDeployment { source: ApiError },

    #[snafu(display("failed to update cloud function deployment: {source}"))]
    UpdateDeployment { source: ApiError },

    #[snafu(display("cloud function deployment did not become active: {source}"))]
    WaitDeployment { source: WaitError },

    #[snafu(display("failed to read cloud function deployment: {source}"))]
    ReadDeployment { source: ApiError },

    #[snafu(display("failed to delete cloud function deployment {version_id}: {source}"))]
    DeleteDeployment {
        version_id: VersionId,
        source: ApiError,
    },

    #[snafu(display("failed to delete cloud function version {version_id}: {source}"))]
    DeleteFunction {
        version_id: VersionId,
        source: ApiError,
    },

    /// The old version was deleted for replacement and its successor failed.
    #[snafu(display("version {version_id} was deleted for replacement: {source}"))]
    Replace {
        version_id: VersionId,
        source: Box<ResourceError>,
    },

    /// The deployment failed and the failed version could not be removed.
    #[snafu(display(
        "{source}; additionally failed to delete the failed function version {version_id}: {cleanup}"
    ))]
    Rollback {
        version_id: VersionId,
        source: Box<ResourceError>,
        cleanup: ApiError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceErrorKind {
    /// Desired state or import identifier rejected locally.
    Validation,
    /// Network failure or client misconfiguration.
    Transport,
    /// Credentials were rejected.
    Unauthenticated,
    /// The addressed function, version, or deployment does not exist.
    NotFound,
    /// The control plane rejected a request.
    Remote,
    /// A response body could not be decoded.
    Malformed,
    /// The deployment reached a terminal status other than ACTIVE.
    DeploymentFailed,
    /// The operation deadline elapsed while the deployment was still deploying.
    Timeout,
}

impl ResourceError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ResourceErrorKind {
        match self {
            ResourceError::Validation { .. } | ResourceError::Import { .. } => {
                ResourceErrorKind::Validation
            }
            ResourceError::VersionNotFound { .. } => ResourceErrorKind::NotFound,
            ResourceError::WaitDeployment { source } => match source {
                WaitError::Failed { .. } | WaitError::Missing { .. } => {
                    ResourceErrorKind::DeploymentFailed
                }
                WaitError::Timeout { .. } => ResourceErrorKind::Timeout,
                WaitError::Api(api) => api_kind(api),
            },
            ResourceError::Rollback { source, .. } | ResourceError::Replace { source, .. } => {
                source.kind()
            }
            ResourceError::CreateFunction { source }
            | ResourceError::GetFunction { source, .. }
            | ResourceError::ListVersions { source, .. }
            | ResourceError::UpdateTags { source }
            | ResourceError::ListAuthorization { source }
            | ResourceError::Authorize { source }
            | ResourceError::Unauthorize { source }
            | ResourceError::CreateDeployment { source }
            | ResourceError::UpdateDeployment { source }
            | ResourceError::ReadDeployment { source }
            | ResourceError::DeleteDeployment { source, .. }
            | ResourceError::DeleteFunction { source, .. } => api_kind(source),
        }
    }

    /// True when a replacement already removed the version recorded in state.
    pub fn replaced_version_deleted(&self) -> bool {
        matches!(self, ResourceError::Replace { .. })
    }

    /// The underlying transport error, if this failure came from a request.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ResourceError::Validation { .. }
            | ResourceError::Import { .. }
            | ResourceError::VersionNotFound { .. } => None,
            ResourceError::WaitDeployment { source } => match source {
                WaitError::Api(api) => Some(api),
                _ => None,
            },
            ResourceError::Rollback { source, .. } | ResourceError::Replace { source, .. } => {
                source.api_error()
            }
            ResourceError::CreateFunction { source }
            | ResourceError::GetFunction { source, .. }
            | ResourceError::ListVersions { source, .. }
            | ResourceError::UpdateTags { source }
            | ResourceError::ListAuthorization { source }
            | ResourceError::Authorize { source }
            | ResourceError::Unauthorize { source }
            | ResourceError::CreateDeployment { source }
            | ResourceError::UpdateDeployment { source }
            | ResourceError::ReadDeployment { source }
            | ResourceError::DeleteDeployment { source, .. }
            | ResourceError::DeleteFunction { source, .. } => Some(source),
        }
    }
}

fn api_kind(error: &ApiError) -> ResourceErrorKind {
    match error.kind() {
        ApiErrorKind::Transport => ResourceErrorKind::Transport,
        ApiErrorKind::Unauthenticated => ResourceErrorKind::Unauthenticated,
        ApiErrorKind::NotFound => ResourceErrorKind::NotFound,
        ApiErrorKind::Remote => ResourceErrorKind::Remote,
        ApiErrorKind::Malformed => ResourceErrorKind::Malformed,
    }
}
