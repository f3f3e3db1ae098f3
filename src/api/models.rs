// ABOUTME: Wire types for the cloud function control-plane REST API.
// ABOUTME: Request and response bodies, serialized as camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{FunctionId, NcaId, VersionId};

/// Name/version/URI triple used for both `models` and `resources`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub version: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerEnvironmentEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: u32,
    /// ISO 8601 duration, e.g. `PT10S`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub expected_status_code: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Secret payload. The value is either a plain string or an arbitrary JSON node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecretPayload {
    pub name: String,
    pub value: serde_json::Value,
}

/// A function version as reported by the control plane.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub id: FunctionId,
    #[serde(default)]
    pub nca_id: Option<NcaId>,
    pub version_id: VersionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub inference_url: String,
    #[serde(default)]
    pub owned_by_different_account: bool,
    #[serde(default)]
    pub inference_port: u32,
    #[serde(default)]
    pub container_image: String,
    #[serde(default)]
    pub container_environment: Option<Vec<ContainerEnvironmentEntry>>,
    #[serde(default)]
    pub models: Option<Vec<Artifact>>,
    #[serde(default)]
    pub container_args: String,
    #[serde(default)]
    pub api_body_format: String,
    #[serde(default)]
    pub helm_chart: String,
    #[serde(default)]
    pub helm_chart_service_name: String,
    #[serde(default)]
    pub health_uri: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub health: Option<HealthCheck>,
    #[serde(default)]
    pub resources: Option<Vec<Artifact>>,
    /// Secret names only; values are never returned.
    #[serde(default)]
    pub secrets: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub function_type: String,
}

/// Body of `POST /nvcf/functions[/{id}/versions]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunctionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helm_chart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helm_chart_service_name: Option<String>,
    pub inference_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_uri: Option<String>,
    pub inference_port: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_environment: Vec<ContainerEnvironmentEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_args: Option<String>,
    pub api_body_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthCheck>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Artifact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<SecretPayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub function_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FunctionEnvelope {
    pub function: FunctionInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FunctionListEnvelope {
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateMetadataRequest<'a> {
    pub tags: &'a [String],
}

/// One entry of a deployment: where and how many instances to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpecification {
    #[serde(default)]
    pub gpu: String,
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub max_instances: u32,
    #[serde(default)]
    pub min_instances: u32,
    #[serde(default)]
    pub max_request_concurrency: u32,
    /// Opaque JSON overriding chart values. `null` when unset.
    #[serde(default)]
    pub configuration: Option<serde_json::Value>,
}

/// Deployment status as reported by the control plane.
///
/// `Deploying` is the only non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FunctionStatus {
    Deploying,
    Active,
    Failed,
    /// Any value this crate does not recognise, including an empty status.
    Other(String),
}

impl Default for FunctionStatus {
    fn default() -> Self {
        FunctionStatus::Other(String::new())
    }
}

impl FunctionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FunctionStatus::Deploying)
    }
}

impl From<String> for FunctionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "DEPLOYING" => FunctionStatus::Deploying,
            "ACTIVE" => FunctionStatus::Active,
            "FAILED" => FunctionStatus::Failed,
            _ => FunctionStatus::Other(value),
        }
    }
}

impl From<FunctionStatus> for String {
    fn from(status: FunctionStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for FunctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionStatus::Deploying => write!(f, "DEPLOYING"),
            FunctionStatus::Active => write!(f, "ACTIVE"),
            FunctionStatus::Failed => write!(f, "FAILED"),
            FunctionStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    #[serde(default)]
    pub function_id: FunctionId,
    #[serde(default)]
    pub function_version_id: VersionId,
    #[serde(default)]
    pub nca_id: Option<NcaId>,
    #[serde(default)]
    pub function_status: FunctionStatus,
    #[serde(default)]
    pub health_info: Option<serde_json::Value>,
    #[serde(default)]
    pub deployment_specifications: Vec<DeploymentSpecification>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeploymentRequest<'a> {
    pub deployment_specifications: Vec<&'a DeploymentSpecification>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeploymentEnvelope {
    pub deployment: Deployment,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedParty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub nca_id: NcaId,
}

impl AuthorizedParty {
    pub fn new(nca_id: NcaId) -> Self {
        Self {
            client_id: None,
            nca_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthorizeRequest<'a> {
    pub authorized_parties: &'a [AuthorizedParty],
}

/// Authorization view of a function version.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionAuthorization {
    #[serde(default)]
    pub id: Option<FunctionId>,
    #[serde(default)]
    pub nca_id: Option<NcaId>,
    #[serde(default)]
    pub version_id: Option<VersionId>,
    #[serde(default)]
    pub authorized_parties: Vec<AuthorizedParty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorizationEnvelope {
    #[serde(default)]
    pub function: FunctionAuthorization,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequestStatus {
    #[serde(default)]
    pub status_description: String,
}

/// Either of the two error body shapes the control plane returns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub request_status: Option<RequestStatus>,
    #[serde(default)]
    pub detail: String,
}

impl ErrorBody {
    /// `statusDescription` wins over `detail` when both are present.
    pub fn message(&self) -> String {
        match &self.request_status {
            Some(status) if !status.status_description.is_empty() => {
                status.status_description.clone()
            }
            _ => self.detail.clone(),
        }
    }
}
