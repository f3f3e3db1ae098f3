// ABOUTME: Observed state of a cloud function version, persisted between runs.
// ABOUTME: Merges function, deployment, and authorization responses deterministically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::api::{
    Artifact, ContainerEnvironmentEntry, Deployment, DeploymentSpecification,
    FunctionAuthorization, FunctionInfo, FunctionStatus,
};
use crate::config::FunctionSpec;
use crate::types::{FunctionId, NcaId, VersionId};

use super::workload::{ContainerWorkload, Health, HelmWorkload, Workload};

/// One deployment specification as last observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentState {
    pub backend: String,
    pub instance_type: String,
    pub gpu: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub max_request_concurrency: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
}

impl From<&DeploymentSpecification> for DeploymentState {
    fn from(spec: &DeploymentSpecification) -> Self {
        DeploymentState {
            backend: spec.backend.clone(),
            instance_type: spec.instance_type.clone(),
            gpu: spec.gpu.clone(),
            min_instances: spec.min_instances,
            max_instances: spec.max_instances,
            max_request_concurrency: spec.max_request_concurrency,
            configuration: spec.configuration.clone().filter(|c| !c.is_null()),
        }
    }
}

/// Everything known about a function version after the last lifecycle call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionState {
    pub function_id: FunctionId,
    pub version_id: VersionId,
    #[serde(default)]
    pub nca_id: Option<NcaId>,
    /// Function the version was added to, as requested.
    #[serde(default)]
    pub parent_function_id: Option<FunctionId>,
    pub function_name: String,
    pub function_type: String,
    pub workload: Workload,
    pub inference_url: String,
    pub inference_port: u32,
    #[serde(default)]
    pub health_uri: Option<String>,
    #[serde(default)]
    pub health: Option<Health>,
    pub api_body_format: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub models: BTreeSet<Artifact>,
    #[serde(default)]
    pub resources: BTreeSet<Artifact>,
    /// Secret names only. Values are write-only.
    #[serde(default)]
    pub secret_names: BTreeSet<String>,
    #[serde(default)]
    pub deployment_specifications: Vec<DeploymentState>,
    #[serde(default)]
    pub function_status: Option<FunctionStatus>,
    #[serde(default)]
    pub authorized_parties: BTreeSet<NcaId>,
    #[serde(default)]
    pub keep_failed_resource: bool,
}

impl FunctionState {
    /// State as planned from the desired spec, before any response is merged.
    pub fn planned(spec: &FunctionSpec) -> Self {
        let workload = match &spec.workload {
            Workload::Container(container) => Workload::Container(ContainerWorkload {
                environment: spec.workload.sorted_environment(),
                ..container.clone()
            }),
            helm @ Workload::Helm(_) => helm.clone(),
        };

        FunctionState {
            function_id: FunctionId::default(),
            version_id: VersionId::default(),
            nca_id: None,
            parent_function_id: spec.function_id.clone(),
            function_name: spec.function_name.clone(),
            function_type: spec.effective_function_type().to_string(),
            workload,
            inference_url: spec.inference_url.clone(),
            inference_port: spec.inference_port.unwrap_or_default(),
            health_uri: spec.health_uri.clone(),
            health: spec.health.clone(),
            api_body_format: spec.effective_api_body_format().to_string(),
            description: spec.description.clone(),
            tags: spec.tags.clone(),
            models: spec.models.clone(),
            resources: spec.resources.clone(),
            secret_names: spec.secret_names(),
            deployment_specifications: Vec::new(),
            function_status: None,
            authorized_parties: spec.authorized_parties.clone(),
            keep_failed_resource: spec.keep_failed_resource,
        }
    }

    /// Placeholder for an imported version. Every remote field is filled by
    /// the first [`FunctionState::merge`].
    pub fn imported(function_id: FunctionId, version_id: VersionId) -> Self {
        FunctionState {
            function_id,
            version_id,
            nca_id: None,
            parent_function_id: None,
            function_name: String::new(),
            function_type: String::new(),
            workload: Workload::Container(ContainerWorkload {
                image: String::new(),
                args: None,
                environment: Vec::new(),
            }),
            inference_url: String::new(),
            inference_port: 0,
            health_uri: None,
            health: None,
            api_body_format: String::new(),
            description: None,
            tags: BTreeSet::new(),
            models: BTreeSet::new(),
            resources: BTreeSet::new(),
            secret_names: BTreeSet::new(),
            deployment_specifications: Vec::new(),
            function_status: None,
            authorized_parties: BTreeSet::new(),
            keep_failed_resource: false,
        }
    }

    /// Overlay remote responses. Empty remote strings keep the prior value.
    ///
    /// `deployment = None` means the version has no deployment. Authorized
    /// parties always come from `authorization`, empty when it lists none.
    pub fn merge(
        &mut self,
        function: &FunctionInfo,
        deployment: Option<&Deployment>,
        authorization: &FunctionAuthorization,
    ) {
        self.function_id = function.id.clone();
        self.version_id = function.version_id.clone();
        self.inference_port = function.inference_port;

        if let Some(nca_id) = function.nca_id.as_ref().filter(|id| !id.as_str().is_empty()) {
            self.nca_id = Some(nca_id.clone());
        }
        overlay(&mut self.function_name, &function.name);
        overlay(&mut self.function_type, &function.function_type);
        overlay(&mut self.inference_url, &function.inference_url);
        overlay(&mut self.api_body_format, &function.api_body_format);
        overlay_opt(&mut self.health_uri, &function.health_uri);
        overlay_opt(&mut self.description, &function.description);

        self.merge_workload(function);

        if let Some(tags) = &function.tags {
            self.tags = tags.iter().cloned().collect();
        }
        if let Some(health) = &function.health {
            self.health = Some(Health::from(health.clone()));
        }
        if let Some(models) = &function.models {
            self.models = models.iter().cloned().collect();
        }
        if let Some(resources) = &function.resources {
            self.resources = resources.iter().cloned().collect();
        }

        match deployment {
            Some(deployment) => {
                self.deployment_specifications = deployment
                    .deployment_specifications
                    .iter()
                    .map(DeploymentState::from)
                    .collect();
                self.function_status = Some(deployment.function_status.clone());
            }
            None => {
                self.deployment_specifications.clear();
                self.function_status = None;
            }
        }

        self.authorized_parties = authorization
            .authorized_parties
            .iter()
            .map(|party| party.nca_id.clone())
            .collect();
    }

    fn merge_workload(&mut self, function: &FunctionInfo) {
        if !function.helm_chart.is_empty() {
            let service_name = match &self.workload {
                Workload::Helm(helm) if function.helm_chart_service_name.is_empty() => {
                    helm.service_name.clone()
                }
                _ => function.helm_chart_service_name.clone(),
            };
            self.workload = Workload::Helm(HelmWorkload {
                chart: function.helm_chart.clone(),
                service_name,
            });
            return;
        }

        if function.container_image.is_empty() && function.container_environment.is_none() {
            return;
        }

        if let Workload::Container(container) = &mut self.workload {
            overlay(&mut container.image, &function.container_image);
            overlay_opt(&mut container.args, &function.container_args);
            if let Some(environment) = &function.container_environment {
                container.environment = sorted(Some(environment));
            }
            return;
        }

        self.workload = Workload::Container(ContainerWorkload {
            image: function.container_image.clone(),
            args: non_empty(&function.container_args),
            environment: sorted(function.container_environment.as_deref()),
        });
    }

    /// `"{function_id},{version_id}"`, the import identifier of this version.
    pub fn import_id(&self) -> String {
        format!("{},{}", self.function_id, self.version_id)
    }
}

fn overlay(target: &mut String, remote: &str) {
    if !remote.is_empty() {
        *target = remote.to_string();
    }
}

fn overlay_opt(target: &mut Option<String>, remote: &str) {
    if !remote.is_empty() {
        *target = Some(remote.to_string());
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn sorted(environment: Option<&[ContainerEnvironmentEntry]>) -> Vec<ContainerEnvironmentEntry> {
    let mut environment = environment.map(<[_]>::to_vec).unwrap_or_default();
    environment.sort_by(|a, b| a.key.cmp(&b.key));
    environment
}
