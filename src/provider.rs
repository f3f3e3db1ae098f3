// ABOUTME: Composition root: owns provider settings and the shared API client.
// ABOUTME: Builds the client once on first use and hands it to resources and data sources.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::api::{ApiError, NvcfClient};
use crate::config::ProviderConfig;
use crate::reconcile::{CloudFunctionDataSource, CloudFunctionResource, DeploymentWaiter};

/// Wires configuration, client, and waiter together.
///
/// The client is created lazily. Concurrent first callers share the one
/// instance that wins initialisation.
pub struct Provider {
    config: ProviderConfig,
    client: OnceCell<Arc<NvcfClient>>,
}

impl Provider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The shared client, built on first call.
    pub async fn client(&self) -> Result<Arc<NvcfClient>, ApiError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                tracing::debug!(base_url = %self.config.base_url(), "building API client");
                NvcfClient::new(&self.config).map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(client))
    }

    pub fn waiter(&self) -> DeploymentWaiter {
        DeploymentWaiter::new(self.config.poll_interval)
    }

    pub async fn resource(&self) -> Result<CloudFunctionResource<NvcfClient>, ApiError> {
        Ok(CloudFunctionResource::new(self.client().await?, self.waiter()))
    }

    pub async fn data_source(&self) -> Result<CloudFunctionDataSource<NvcfClient>, ApiError> {
        Ok(CloudFunctionDataSource::new(self.client().await?))
    }
}
