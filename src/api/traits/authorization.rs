// ABOUTME: Authorization operations trait for the control-plane client.
// ABOUTME: Grant, list, and revoke invocation rights on a function version.

use super::super::error::ApiError;
use super::super::models::{AuthorizedParty, FunctionAuthorization};
use crate::types::{FunctionId, VersionId};
use async_trait::async_trait;

/// Invocation-rights operations.
#[async_trait]
pub trait AuthorizationOps: Send + Sync {
    /// Overwrite the authorized parties with exactly `parties`.
    async fn authorize_parties(
        &self,
        function: &FunctionId,
        version: &VersionId,
        parties: &[AuthorizedParty],
    ) -> Result<FunctionAuthorization, ApiError>;

    /// Remove every extra authorized party.
    async fn unauthorize_all_parties(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<(), ApiError>;

    async fn get_authorization(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<FunctionAuthorization, ApiError>;
}
