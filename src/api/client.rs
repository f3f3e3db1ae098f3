// ABOUTME: Typed control-plane client built on the shared JSON transport.
// ABOUTME: One method per endpoint; no business logic beyond request shaping.

use async_trait::async_trait;
use nonempty::NonEmpty;
use reqwest::{Method, StatusCode};

use super::endpoints;
use super::error::ApiError;
use super::models::{
    AuthorizationEnvelope, AuthorizeRequest, AuthorizedParty, CreateFunctionRequest, Deployment,
    DeploymentEnvelope, DeploymentRequest, DeploymentSpecification, FunctionAuthorization,
    FunctionEnvelope, FunctionInfo, FunctionListEnvelope, UpdateMetadataRequest,
};
use super::traits::{AuthorizationOps, DeploymentOps, FunctionOps};
use super::transport::Transport;
use crate::config::ProviderConfig;
use crate::types::{FunctionId, VersionId};

const OK: &[StatusCode] = &[StatusCode::OK];
const NO_CONTENT: &[StatusCode] = &[StatusCode::NO_CONTENT];
const OK_OR_MISSING: &[StatusCode] = &[StatusCode::OK, StatusCode::NOT_FOUND];

/// Marker for requests without a body.
const NO_BODY: Option<&()> = None;

/// Client for the cloud function control plane.
#[derive(Clone)]
pub struct NvcfClient {
    transport: Transport,
}

impl NvcfClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    pub fn from_transport(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

// =============================================================================
// Function versions
// =============================================================================

#[async_trait]
impl FunctionOps for NvcfClient {
    async fn create_function(
        &self,
        parent: Option<&FunctionId>,
        request: &CreateFunctionRequest,
    ) -> Result<FunctionInfo, ApiError> {
        let path = match parent {
            Some(function) => endpoints::function_versions(function),
            None => endpoints::functions(),
        };
        tracing::debug!(name = %request.name, parent = ?parent.map(|f| f.as_str()), "creating function");

        let reply = self
            .transport
            .send(Method::POST, &path, Some(request), OK)
            .await?;
        let envelope: FunctionEnvelope = reply.json()?;
        Ok(envelope.function)
    }

    async fn list_function_versions(
        &self,
        function: &FunctionId,
    ) -> Result<Vec<FunctionInfo>, ApiError> {
        let reply = self
            .transport
            .send(
                Method::GET,
                &endpoints::function_versions(function),
                NO_BODY,
                OK,
            )
            .await?;
        let envelope: FunctionListEnvelope = reply.json()?;
        Ok(envelope.functions)
    }

    async fn get_function_version(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<FunctionInfo, ApiError> {
        let reply = self
            .transport
            .send(
                Method::GET,
                &endpoints::function_version(function, version),
                NO_BODY,
                OK,
            )
            .await?;
        let envelope: FunctionEnvelope = reply.json()?;
        Ok(envelope.function)
    }

    async fn update_function_tags(
        &self,
        function: &FunctionId,
        version: &VersionId,
        tags: &[String],
    ) -> Result<FunctionInfo, ApiError> {
        tracing::debug!(function_id = %function, version_id = %version, ?tags, "updating tags");
        let reply = self
            .transport
            .send(
                Method::PUT,
                &endpoints::function_metadata(function, version),
                Some(&UpdateMetadataRequest { tags }),
                OK,
            )
            .await?;
        let envelope: FunctionEnvelope = reply.json()?;
        Ok(envelope.function)
    }

    async fn delete_function_version(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<(), ApiError> {
        tracing::debug!(function_id = %function, version_id = %version, "deleting function version");
        self.transport
            .send(
                Method::DELETE,
                &endpoints::function_version(function, version),
                NO_BODY,
                NO_CONTENT,
            )
            .await?;
        Ok(())
    }
}

// =============================================================================
// Deployments
// =============================================================================

#[async_trait]
impl DeploymentOps for NvcfClient {
    async fn create_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
        specifications: &NonEmpty<DeploymentSpecification>,
    ) -> Result<Deployment, ApiError> {
        self.put_deployment(Method::POST, function, version, specifications)
            .await
    }

    async fn update_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
        specifications: &NonEmpty<DeploymentSpecification>,
    ) -> Result<Deployment, ApiError> {
        self.put_deployment(Method::PUT, function, version, specifications)
            .await
    }

    async fn read_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<Option<Deployment>, ApiError> {
        let reply = self
            .transport
            .send(
                Method::GET,
                &endpoints::deployment(function, version),
                NO_BODY,
                OK_OR_MISSING,
            )
            .await?;

        if reply.status == StatusCode::NOT_FOUND {
            tracing::debug!(function_id = %function, version_id = %version, "no deployment");
            return Ok(None);
        }

        let envelope: DeploymentEnvelope = reply.json()?;
        Ok(Some(envelope.deployment))
    }

    async fn delete_deployment(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<(), ApiError> {
        tracing::debug!(function_id = %function, version_id = %version, "deleting deployment");
        self.transport
            .send(
                Method::DELETE,
                &endpoints::deployment(function, version),
                NO_BODY,
                OK,
            )
            .await?;
        Ok(())
    }
}

impl NvcfClient {
    async fn put_deployment(
        &self,
        method: Method,
        function: &FunctionId,
        version: &VersionId,
        specifications: &NonEmpty<DeploymentSpecification>,
    ) -> Result<Deployment, ApiError> {
        tracing::debug!(
            function_id = %function,
            version_id = %version,
            %method,
            specs = specifications.len(),
            "submitting deployment"
        );
        let request = DeploymentRequest {
            deployment_specifications: specifications.iter().collect(),
        };
        let reply = self
            .transport
            .send(
                method,
                &endpoints::deployment(function, version),
                Some(&request),
                OK,
            )
            .await?;
        let envelope: DeploymentEnvelope = reply.json()?;
        Ok(envelope.deployment)
    }
}

// =============================================================================
// Authorizations
// =============================================================================

#[async_trait]
impl AuthorizationOps for NvcfClient {
    async fn authorize_parties(
        &self,
        function: &FunctionId,
        version: &VersionId,
        parties: &[AuthorizedParty],
    ) -> Result<FunctionAuthorization, ApiError> {
        tracing::debug!(
            function_id = %function,
            version_id = %version,
            parties = parties.len(),
            "authorizing parties"
        );
        let reply = self
            .transport
            .send(
                Method::POST,
                &endpoints::authorization(function, version),
                Some(&AuthorizeRequest {
                    authorized_parties: parties,
                }),
                OK,
            )
            .await?;
        let envelope: AuthorizationEnvelope = reply.json()?;
        Ok(envelope.function)
    }

    async fn unauthorize_all_parties(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<(), ApiError> {
        tracing::debug!(function_id = %function, version_id = %version, "clearing authorized parties");
        self.transport
            .send(
                Method::DELETE,
                &endpoints::authorization(function, version),
                NO_BODY,
                OK,
            )
            .await?;
        Ok(())
    }

    async fn get_authorization(
        &self,
        function: &FunctionId,
        version: &VersionId,
    ) -> Result<FunctionAuthorization, ApiError> {
        let reply = self
            .transport
            .send(
                Method::GET,
                &endpoints::authorization(function, version),
                NO_BODY,
                OK,
            )
            .await?;
        let envelope: AuthorizationEnvelope = reply.json()?;
        Ok(envelope.function)
    }
}
