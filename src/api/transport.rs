// ABOUTME: Authenticated JSON transport over reqwest.
// ABOUTME: Enforces the accepted-status contract shared by every endpoint.

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, classify_failure};
use crate::config::ProviderConfig;

/// A response whose status was in the accepted set.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(ApiError::Decode)
    }
}

/// Shared HTTP plumbing: base URL, bearer token, connection pool.
///
/// `reqwest::Client` is internally reference counted, so cloning a transport
/// shares its pool.
#[derive(Clone)]
pub struct Transport {
    http: Client,
    base_url: String,
    api_key: String,
}

impl Transport {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and check its status against `accepted`.
    ///
    /// Statuses outside `accepted` become typed errors; see
    /// [`ApiError::kind`].
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        accepted: &[StatusCode],
    ) -> Result<Reply, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(ApiError::Encode)?;
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(|source| {
            tracing::error!(%url, %method, "failed to send request");
            ApiError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        // Request bodies may carry secret values and are never logged.
        tracing::debug!(
            %method,
            %url,
            status = status.as_u16(),
            response_body = %text,
            "sent request"
        );

        if !accepted.contains(&status) {
            tracing::error!(%method, %url, status = status.as_u16(), "unexpected response code");
            return Err(classify_failure(status, &text));
        }

        Ok(Reply { status, body: text })
    }
}
