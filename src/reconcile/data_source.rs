// ABOUTME: Read-only lookup of an existing cloud function version.
// ABOUTME: Lists the function's versions and merges the match with its deployment.

use std::sync::Arc;

use snafu::ResultExt;

use crate::api::CloudFunctionApi;
use crate::model::FunctionState;
use crate::types::{FunctionId, VersionId};

use super::error::{
    ListAuthorizationSnafu, ListVersionsSnafu, ReadDeploymentSnafu, ResourceError,
    VersionNotFoundSnafu,
};

pub struct CloudFunctionDataSource<A: ?Sized> {
    api: Arc<A>,
}

impl<A> CloudFunctionDataSource<A>
where
    A: CloudFunctionApi + ?Sized,
{
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn read(
        &self,
        function_id: &FunctionId,
        version_id: &VersionId,
    ) -> Result<FunctionState, ResourceError> {
        let versions = self
            .api
            .list_function_versions(function_id)
            .await
            .context(ListVersionsSnafu {
                function_id: function_id.clone(),
            })?;

        let function = versions
            .into_iter()
            .find(|f| f.version_id == *version_id)
            .ok_or_else(|| {
                VersionNotFoundSnafu {
                    function_id: function_id.clone(),
                    version_id: version_id.clone(),
                }
                .build()
            })?;

        let deployment = self
            .api
            .read_deployment(function_id, version_id)
            .await
            .context(ReadDeploymentSnafu)?;

        let authorization = self
            .api
            .get_authorization(function_id, version_id)
            .await
            .context(ListAuthorizationSnafu)?;

        tracing::debug!(
            function_id = %function_id,
            version_id = %version_id,
            deployed = deployment.is_some(),
            "read cloud function"
        );

        let mut state = FunctionState::imported(function_id.clone(), version_id.clone());
        state.merge(&function, deployment.as_ref(), &authorization);
        Ok(state)
    }
}
