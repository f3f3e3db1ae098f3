// ABOUTME: Function version operations trait for the control-plane client.
// ABOUTME: Create, list, get, retag, and delete function versions.

use super::super::error::ApiError;
use super::super::models::{CreateFunctionRequest, FunctionInfo};
use crate::types::{FunctionId, VersionId};
use async_trait::async_trait;

/// Function version lifecycle operations.
#[async_trait]
pub trait FunctionOps: Send + Sync {
    /// Create a function. With `parent` set, a new version of that function
    /// is created instead of a new function family.
    async fn create_function(
        &self,
        parent: Option<&FunctionId>,
        request: &CreateFunctionRequest,
    ) -> Result<FunctionInfo, ApiError>;

    /// List every version of a function.
    async fn list_function_versions(
        &self,
        function: &FunctionId,
    ) -> Result<Vec<FunctionInfo>, ApiError>;

    /// Get one function version. Absence is [`ApiErrorKind::NotFound`].
    ///
    /// [`ApiErrorKind::NotFound`]: super::super::ApiErrorKind::NotFound
    async fn get_function_version(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<FunctionInfo, ApiError>;

    /// Replace the tag set of a function version.
    async fn update_function_tags(
        &self,
        function: &FunctionId,
        version: &VersionId,
        tags: &[String],
    ) -> Result<FunctionInfo, ApiError>;

    /// Delete a function version. The control plane removes its deployment.
    async fn delete_function_version(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<(), ApiError>;
}
