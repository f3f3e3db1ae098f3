// ABOUTME: Provider connection settings for the control-plane API.
// ABOUTME: Resolves endpoint, org, team, and API key from flags and environment.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.ngc.nvidia.com";
pub const ENV_ENDPOINT: &str = "NGC_ENDPOINT";
pub const ENV_API_KEY: &str = "NGC_API_KEY";
pub const ENV_ORG: &str = "NGC_ORG";
pub const ENV_TEAM: &str = "NGC_TEAM";

/// Explicitly supplied settings. These take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderOverrides {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub org: Option<String>,
    pub team: Option<String>,
    pub poll_interval: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub org: String,
    pub team: Option<String>,
    /// Delay between deployment status polls.
    pub poll_interval: Duration,
    /// Per-request HTTP timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

pub fn default_poll_interval() -> Duration {
    Duration::from_secs(60)
}

impl ProviderConfig {
    /// Build the configuration from explicit settings, falling back to the
    /// `NGC_*` environment variables. Empty values count as unset.
    pub fn resolve(overrides: ProviderOverrides) -> Result<Self> {
        let api_key = pick(overrides.api_key, ENV_API_KEY).ok_or(Error::MissingSetting {
            attribute: "ngc_api_key",
            env: ENV_API_KEY,
        })?;

        let org = pick(overrides.org, ENV_ORG).ok_or(Error::MissingSetting {
            attribute: "ngc_org",
            env: ENV_ORG,
        })?;

        let endpoint =
            pick(overrides.endpoint, ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(ProviderConfig {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            org,
            team: pick(overrides.team, ENV_TEAM),
            poll_interval: overrides.poll_interval.unwrap_or_else(default_poll_interval),
            request_timeout: overrides.request_timeout,
        })
    }

    /// Base URL for every cloud function endpoint.
    pub fn base_url(&self) -> String {
        match &self.team {
            Some(team) => format!("{}/v2/orgs/{}/teams/{}", self.endpoint, self.org, team),
            None => format!("{}/v2/orgs/{}", self.endpoint, self.org),
        }
    }
}

fn pick(explicit: Option<String>, env: &str) -> Option<String> {
    explicit
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(env).ok().filter(|v| !v.is_empty()))
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("org", &self.org)
            .field("team", &self.team)
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
