// ABOUTME: Workload and health check types shared by desired and observed state.
// ABOUTME: A function runs either a container image or a Helm chart, never both.

use serde::{Deserialize, Serialize};

use crate::api::{ContainerEnvironmentEntry, HealthCheck};

/// What the function runs. Fixed for the lifetime of a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    Container(ContainerWorkload),
    Helm(HelmWorkload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerWorkload {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<ContainerEnvironmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelmWorkload {
    pub chart: String,
    pub service_name: String,
}

impl Workload {
    pub fn kind(&self) -> &'static str {
        match self {
            Workload::Container(_) => "container",
            Workload::Helm(_) => "helm",
        }
    }

    /// Container environment sorted by key. Empty for Helm workloads.
    pub fn sorted_environment(&self) -> Vec<ContainerEnvironmentEntry> {
        match self {
            Workload::Container(container) => {
                let mut environment = container.environment.clone();
                environment.sort();
                environment
            }
            Workload::Helm(_) => Vec::new(),
        }
    }
}

/// Health probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Health {
    pub protocol: String,
    pub uri: String,
    pub port: u32,
    /// ISO 8601 duration, e.g. `PT10S`.
    pub timeout: String,
    pub expected_status_code: u32,
}

impl From<&Health> for HealthCheck {
    fn from(health: &Health) -> Self {
        HealthCheck {
            protocol: health.protocol.clone(),
            uri: health.uri.clone(),
            port: health.port,
            timeout: health.timeout.clone(),
            expected_status_code: health.expected_status_code,
        }
    }
}

impl From<HealthCheck> for Health {
    fn from(check: HealthCheck) -> Self {
        Health {
            protocol: check.protocol,
            uri: check.uri,
            port: check.port,
            timeout: check.timeout,
            expected_status_code: check.expected_status_code,
        }
    }
}
