// ABOUTME: Desired-state fixtures for integration tests.
// ABOUTME: Builds FunctionSpec values from YAML the way users write them.

use nvcf::config::FunctionSpec;

pub const BASE_YAML: &str = r#"
function_name: echo
container:
  image: nvcr.io/acme/echo:1
inference_url: /echo
inference_port: 8000
"#;

pub const DEPLOYMENT_YAML: &str = r#"
deployment_specifications:
  - backend: GFN
    instance_type: gl40_1.br20_2xlarge
    gpu: L40
    min_instances: 1
    max_instances: 2
    max_request_concurrency: 4
"#;

/// The base function plus `extra` top-level keys.
pub fn spec(extra: &str) -> FunctionSpec {
    FunctionSpec::from_yaml(&format!("{BASE_YAML}{extra}")).unwrap()
}

/// The base function with one deployment specification.
pub fn deployed_spec() -> FunctionSpec {
    spec(DEPLOYMENT_YAML)
}

pub fn yaml(extra: &str) -> String {
    format!("{BASE_YAML}{extra}")
}
