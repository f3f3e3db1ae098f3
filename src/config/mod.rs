// ABOUTME: Desired-state configuration for a cloud function (nvcf.yml).
// ABOUTME: Handles YAML parsing, workload selection, and provider settings.

mod init;
mod provider;
mod secret_value;
mod timeouts;

pub use init::init_config;
pub use provider::{
    DEFAULT_ENDPOINT, ENV_API_KEY, ENV_ENDPOINT, ENV_ORG, ENV_TEAM, ProviderConfig,
    ProviderOverrides, default_poll_interval,
};
pub use secret_value::{SecretSpec, SecretValue};
pub use timeouts::{DEFAULT_OPERATION_TIMEOUT, Timeouts};

use crate::api::Artifact;
use crate::error::{Error, Result};
use crate::model::{ContainerWorkload, Health, HelmWorkload, Workload};
use crate::types::{FunctionId, NcaId};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "nvcf.yml";
pub const CONFIG_FILENAME_ALT: &str = "nvcf.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".nvcf/function.yml";

pub const DEFAULT_FUNCTION_TYPE: &str = "DEFAULT";
pub const DEFAULT_API_BODY_FORMAT: &str = "CUSTOM";

/// Desired state of one cloud function version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFunctionSpec")]
pub struct FunctionSpec {
    /// Existing function to add a version to. `None` creates a new function.
    pub function_id: Option<FunctionId>,
    pub function_name: String,
    pub workload: Workload,
    pub inference_url: String,
    pub inference_port: Option<u32>,
    /// Deprecated in favour of `health`.
    pub health_uri: Option<String>,
    pub health: Option<Health>,
    pub api_body_format: Option<String>,
    pub function_type: Option<String>,
    pub description: Option<String>,
    pub tags: BTreeSet<String>,
    pub models: BTreeSet<Artifact>,
    pub resources: BTreeSet<Artifact>,
    pub secrets: Vec<SecretSpec>,
    pub deployment_specifications: Vec<DeploymentSpec>,
    pub authorized_parties: BTreeSet<NcaId>,
    pub keep_failed_resource: bool,
    pub timeouts: Timeouts,
}

/// Where and how many instances of the function to run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentSpec {
    #[serde(default)]
    pub backend: String,
    pub instance_type: String,
    #[serde(alias = "gpu_type")]
    pub gpu: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub max_request_concurrency: u32,
    /// JSON document overriding chart values.
    #[serde(default)]
    pub configuration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFunctionSpec {
    #[serde(default)]
    function_id: Option<FunctionId>,
    function_name: String,
    #[serde(default)]
    container: Option<ContainerWorkload>,
    #[serde(default)]
    helm: Option<HelmWorkload>,
    inference_url: String,
    #[serde(default)]
    inference_port: Option<u32>,
    #[serde(default)]
    health_uri: Option<String>,
    #[serde(default)]
    health: Option<Health>,
    #[serde(default)]
    api_body_format: Option<String>,
    #[serde(default)]
    function_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    models: BTreeSet<Artifact>,
    #[serde(default)]
    resources: BTreeSet<Artifact>,
    #[serde(default)]
    secrets: Vec<SecretSpec>,
    #[serde(default)]
    deployment_specifications: Vec<DeploymentSpec>,
    #[serde(default)]
    authorized_parties: BTreeSet<NcaId>,
    #[serde(default)]
    keep_failed_resource: bool,
    #[serde(default)]
    timeouts: Timeouts,
}

impl TryFrom<RawFunctionSpec> for FunctionSpec {
    type Error = String;

    fn try_from(raw: RawFunctionSpec) -> std::result::Result<Self, Self::Error> {
        if raw.function_name.trim().is_empty() {
            return Err("function_name must not be empty".to_string());
        }

        let workload = match (raw.container, raw.helm) {
            (Some(container), None) => {
                if container.image.is_empty() {
                    return Err("container.image must not be empty".to_string());
                }
                Workload::Container(container)
            }
            (None, Some(helm)) => {
                if helm.chart.is_empty() || helm.service_name.is_empty() {
                    return Err("helm.chart and helm.service_name are both required".to_string());
                }
                Workload::Helm(helm)
            }
            (Some(_), Some(_)) => {
                return Err("exactly one of container or helm may be set, found both".to_string());
            }
            (None, None) => return Err("one of container or helm is required".to_string()),
        };

        let mut secret_names = BTreeSet::new();
        for secret in &raw.secrets {
            if !secret_names.insert(secret.name.as_str()) {
                return Err(format!("duplicate secret name: {}", secret.name));
            }
        }

        Ok(FunctionSpec {
            function_id: raw.function_id.filter(|id| !id.as_str().is_empty()),
            function_name: raw.function_name,
            workload,
            inference_url: raw.inference_url,
            inference_port: raw.inference_port,
            health_uri: raw.health_uri,
            health: raw.health,
            api_body_format: raw.api_body_format,
            function_type: raw.function_type,
            description: raw.description,
            tags: raw.tags,
            models: raw.models,
            resources: raw.resources,
            secrets: raw.secrets,
            deployment_specifications: raw.deployment_specifications,
            authorized_parties: raw.authorized_parties,
            keep_failed_resource: raw.keep_failed_resource,
            timeouts: raw.timeouts,
        })
    }
}

impl FunctionSpec {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Function type sent to the control plane.
    pub fn effective_function_type(&self) -> &str {
        self.function_type.as_deref().unwrap_or(DEFAULT_FUNCTION_TYPE)
    }

    /// API body format sent to the control plane.
    pub fn effective_api_body_format(&self) -> &str {
        self.api_body_format
            .as_deref()
            .unwrap_or(DEFAULT_API_BODY_FORMAT)
    }

    pub fn secret_names(&self) -> BTreeSet<String> {
        self.secrets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn template() -> Self {
        FunctionSpec {
            function_id: None,
            function_name: "my-function".to_string(),
            workload: Workload::Container(ContainerWorkload {
                image: "nvcr.io/my-org/my-function:latest".to_string(),
                args: None,
                environment: Vec::new(),
            }),
            inference_url: "/v1/infer".to_string(),
            inference_port: Some(8000),
            health_uri: None,
            health: None,
            api_body_format: None,
            function_type: None,
            description: None,
            tags: BTreeSet::new(),
            models: BTreeSet::new(),
            resources: BTreeSet::new(),
            secrets: Vec::new(),
            deployment_specifications: vec![DeploymentSpec {
                backend: "GFN".to_string(),
                instance_type: "gl40_1.br20_2xlarge".to_string(),
                gpu: "L40".to_string(),
                min_instances: 1,
                max_instances: 1,
                max_request_concurrency: 1,
                configuration: None,
            }],
            authorized_parties: BTreeSet::new(),
            keep_failed_resource: false,
            timeouts: Timeouts::default(),
        }
    }
}
