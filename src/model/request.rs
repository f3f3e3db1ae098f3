// ABOUTME: Builds control-plane request bodies from desired state.
// ABOUTME: All local validation happens here, before any remote call.

use nonempty::NonEmpty;

use crate::api::{
    AuthorizedParty, CreateFunctionRequest, DeploymentSpecification, HealthCheck, SecretPayload,
};
use crate::config::{DeploymentSpec, FunctionSpec};

use super::workload::Workload;

/// Local validation failures. None of these reach the network.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("failed to parse deployment configuration for specification {index}: {source}")]
    InvalidConfiguration {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("secret {secret:?} looks like JSON but does not parse: {source}")]
    InvalidSecretJson {
        secret: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("secret {secret:?} references environment variable {var} which is not set")]
    MissingSecretEnv { secret: String, var: String },

    #[error(
        "deployment specification {index}: min_instances ({min}) exceeds max_instances ({max})"
    )]
    InstanceRange { index: usize, min: u32, max: u32 },
}

/// Every request body a create needs, built up front.
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub function: CreateFunctionRequest,
    pub deployment: Option<NonEmpty<DeploymentSpecification>>,
    pub parties: Vec<AuthorizedParty>,
}

/// Request bodies an in-place update needs.
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    pub tags: Vec<String>,
    pub deployment: Option<NonEmpty<DeploymentSpecification>>,
    pub parties: Vec<AuthorizedParty>,
}

impl CreatePlan {
    pub fn build(spec: &FunctionSpec) -> Result<Self, ValidationError> {
        Ok(CreatePlan {
            function: create_request(spec)?,
            deployment: deployment_specifications(spec)?,
            parties: authorized_parties(spec),
        })
    }
}

impl UpdatePlan {
    pub fn build(spec: &FunctionSpec) -> Result<Self, ValidationError> {
        Ok(UpdatePlan {
            tags: spec.tags.iter().cloned().collect(),
            deployment: deployment_specifications(spec)?,
            parties: authorized_parties(spec),
        })
    }
}

pub fn create_request(spec: &FunctionSpec) -> Result<CreateFunctionRequest, ValidationError> {
    let mut request = CreateFunctionRequest {
        name: spec.function_name.clone(),
        inference_url: spec.inference_url.clone(),
        inference_port: spec.inference_port.unwrap_or_default(),
        api_body_format: spec.effective_api_body_format().to_string(),
        function_type: spec.effective_function_type().to_string(),
        health_uri: spec.health_uri.clone(),
        description: spec.description.clone(),
        health: spec.health.as_ref().map(HealthCheck::from),
        tags: spec.tags.iter().cloned().collect(),
        models: spec.models.iter().cloned().collect(),
        resources: spec.resources.iter().cloned().collect(),
        secrets: secret_payloads(spec)?,
        ..Default::default()
    };

    match &spec.workload {
        Workload::Container(container) => {
            request.container_image = Some(container.image.clone());
            request.container_args = container.args.clone();
            request.container_environment = container.environment.clone();
        }
        Workload::Helm(helm) => {
            request.helm_chart = Some(helm.chart.clone());
            request.helm_chart_service_name = Some(helm.service_name.clone());
        }
    }

    Ok(request)
}

/// Secrets with an empty value are skipped.
fn secret_payloads(spec: &FunctionSpec) -> Result<Vec<SecretPayload>, ValidationError> {
    let mut payloads = Vec::with_capacity(spec.secrets.len());
    for secret in &spec.secrets {
        let raw = secret.value.resolve(&secret.name)?;
        if raw.is_empty() {
            continue;
        }
        payloads.push(SecretPayload {
            name: secret.name.clone(),
            value: secret_value(&secret.name, &raw)?,
        });
    }
    Ok(payloads)
}

/// Object and array literals are sent as JSON; anything else as a string.
pub fn secret_value(name: &str, raw: &str) -> Result<serde_json::Value, ValidationError> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(raw).map_err(|source| ValidationError::InvalidSecretJson {
            secret: name.to_string(),
            source,
        })
    } else {
        Ok(serde_json::Value::String(raw.to_string()))
    }
}

/// `None` when the desired state asks for no deployment.
pub fn deployment_specifications(
    spec: &FunctionSpec,
) -> Result<Option<NonEmpty<DeploymentSpecification>>, ValidationError> {
    let specs = spec
        .deployment_specifications
        .iter()
        .enumerate()
        .map(|(index, d)| to_wire(index, d))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NonEmpty::from_vec(specs))
}

fn to_wire(index: usize, spec: &DeploymentSpec) -> Result<DeploymentSpecification, ValidationError> {
    if spec.min_instances > spec.max_instances {
        return Err(ValidationError::InstanceRange {
            index,
            min: spec.min_instances,
            max: spec.max_instances,
        });
    }

    Ok(DeploymentSpecification {
        gpu: spec.gpu.clone(),
        backend: spec.backend.clone(),
        instance_type: spec.instance_type.clone(),
        max_instances: spec.max_instances,
        min_instances: spec.min_instances,
        max_request_concurrency: spec.max_request_concurrency,
        configuration: parse_configuration(index, spec.configuration.as_deref())?,
    })
}

/// Empty text means no configuration.
pub fn parse_configuration(
    index: usize,
    configuration: Option<&str>,
) -> Result<Option<serde_json::Value>, ValidationError> {
    match configuration {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => serde_json::from_str(text)
            .map(Some)
            .map_err(|source| ValidationError::InvalidConfiguration { index, source }),
    }
}

fn authorized_parties(spec: &FunctionSpec) -> Vec<AuthorizedParty> {
    spec.authorized_parties
        .iter()
        .cloned()
        .map(AuthorizedParty::new)
        .collect()
}
