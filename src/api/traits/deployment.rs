// ABOUTME: Deployment operations trait for the control-plane client.
// ABOUTME: Create, update, read, and delete the deployment of a function version.

use super::super::error::ApiError;
use super::super::models::{Deployment, DeploymentSpecification};
use crate::types::{FunctionId, VersionId};
use async_trait::async_trait;
use nonempty::NonEmpty;

/// Deployment operations. A function version has at most one deployment.
#[async_trait]
pub trait DeploymentOps: Send + Sync {
    async fn create_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
        specifications: &NonEmpty<DeploymentSpecification>,
    ) -> Result<Deployment, ApiError>;

    /// Replace the whole specification list of an existing deployment.
    async fn update_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
        specifications: &NonEmpty<DeploymentSpecification>,
    ) -> Result<Deployment, ApiError>;

    /// Read the deployment. `None` when the version is not deployed.
    async fn read_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<Option<Deployment>, ApiError>;

    async fn delete_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<(), ApiError>;
}
