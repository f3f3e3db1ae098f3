// ABOUTME: Config scaffolding for new functions.
// ABOUTME: Creates nvcf.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Workload;

use super::{CONFIG_FILENAME, FunctionSpec};

pub fn init_config(dir: &Path, name: Option<&str>, image: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut spec = FunctionSpec::template();

    if let Some(n) = name {
        if n.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "function name must not be empty".to_string(),
            ));
        }
        spec.function_name = n.to_string();
    }

    if let Some(i) = image {
        if let Workload::Container(container) = &mut spec.workload {
            container.image = i.to_string();
        }
    }

    let yaml = generate_template_yaml(&spec);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(spec: &FunctionSpec) -> String {
    let image = match &spec.workload {
        Workload::Container(container) => container.image.as_str(),
        Workload::Helm(_) => "",
    };
    let deployment = spec.deployment_specifications.first();
    format!(
        r#"function_name: {}
container:
  image: {}
inference_url: {}
inference_port: {}
deployment_specifications:
  - backend: {}
    instance_type: {}
    gpu: {}
    min_instances: {}
    max_instances: {}
    max_request_concurrency: {}
# Keep the version around when its deployment fails (default: false)
# keep_failed_resource: true
# timeouts:
#   create: 1h
#   update: 1h
"#,
        spec.function_name,
        image,
        spec.inference_url,
        spec.inference_port.unwrap_or(8000),
        deployment.map(|d| d.backend.as_str()).unwrap_or("GFN"),
        deployment.map(|d| d.instance_type.as_str()).unwrap_or(""),
        deployment.map(|d| d.gpu.as_str()).unwrap_or(""),
        deployment.map(|d| d.min_instances).unwrap_or(1),
        deployment.map(|d| d.max_instances).unwrap_or(1),
        deployment.map(|d| d.max_request_concurrency).unwrap_or(1),
    )
}
