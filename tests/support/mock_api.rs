// ABOUTME: Mock control plane for integration tests, built on wiremock.
// ABOUTME: Canned response bodies, endpoint paths, and clients pointed at the mock.

use std::sync::Arc;
use std::time::Duration;

use nvcf::api::NvcfClient;
use nvcf::config::ProviderConfig;
use nvcf::reconcile::{CloudFunctionDataSource, CloudFunctionResource, DeploymentWaiter};
use serde_json::{Value, json};
use wiremock::{MockServer, ResponseTemplate};

pub const ORG: &str = "acme";
pub const API_KEY: &str = "nvapi-test-key";
pub const FUNCTION_ID: &str = "fn-1";
pub const VERSION_ID: &str = "ver-1";
pub const OWNER_NCA_ID: &str = "nca-owner";

/// Poll interval short enough to keep waiter tests fast.
pub const POLL: Duration = Duration::from_millis(10);

pub fn config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        endpoint: server.uri(),
        api_key: API_KEY.to_string(),
        org: ORG.to_string(),
        team: None,
        poll_interval: POLL,
        request_timeout: Some(Duration::from_secs(5)),
    }
}

pub fn client(server: &MockServer) -> Arc<NvcfClient> {
    Arc::new(NvcfClient::new(&config(server)).unwrap())
}

pub fn resource(server: &MockServer) -> CloudFunctionResource<NvcfClient> {
    CloudFunctionResource::new(client(server), DeploymentWaiter::new(POLL))
}

pub fn data_source(server: &MockServer) -> CloudFunctionDataSource<NvcfClient> {
    CloudFunctionDataSource::new(client(server))
}

// =============================================================================
// Paths
// =============================================================================

pub fn api_path(suffix: &str) -> String {
    format!("/v2/orgs/{ORG}{suffix}")
}

pub fn functions_path() -> String {
    api_path("/nvcf/functions")
}

pub fn versions_path(function_id: &str) -> String {
    api_path(&format!("/nvcf/functions/{function_id}/versions"))
}

pub fn version_path(function_id: &str, version_id: &str) -> String {
    api_path(&format!("/nvcf/functions/{function_id}/versions/{version_id}"))
}

pub fn metadata_path(function_id: &str, version_id: &str) -> String {
    api_path(&format!(
        "/nvcf/metadata/functions/{function_id}/versions/{version_id}"
    ))
}

pub fn deployment_path(function_id: &str, version_id: &str) -> String {
    api_path(&format!(
        "/nvcf/deployments/functions/{function_id}/versions/{version_id}"
    ))
}

pub fn authorization_path(function_id: &str, version_id: &str) -> String {
    api_path(&format!(
        "/nvcf/authorizations/functions/{function_id}/versions/{version_id}"
    ))
}

// =============================================================================
// Bodies
// =============================================================================

pub fn function_json(function_id: &str, version_id: &str) -> Value {
    json!({
        "id": function_id,
        "versionId": version_id,
        "ncaId": OWNER_NCA_ID,
        "name": "echo",
        "status": "ACTIVE",
        "inferenceUrl": "/echo",
        "inferencePort": 8000,
        "containerImage": "nvcr.io/acme/echo:1",
        "apiBodyFormat": "CUSTOM",
        "functionType": "DEFAULT",
        "createdAt": "2026-01-02T03:04:05Z"
    })
}

pub fn function_body(function_id: &str, version_id: &str) -> Value {
    json!({ "function": function_json(function_id, version_id) })
}

pub fn function_body_with_tags(function_id: &str, version_id: &str, tags: &[&str]) -> Value {
    let mut function = function_json(function_id, version_id);
    function["tags"] = json!(tags);
    json!({ "function": function })
}

pub fn specification_json() -> Value {
    json!({
        "gpu": "L40",
        "backend": "GFN",
        "instanceType": "gl40_1.br20_2xlarge",
        "minInstances": 1,
        "maxInstances": 2,
        "maxRequestConcurrency": 4,
        "configuration": null
    })
}

pub fn deployment_body(function_id: &str, version_id: &str, status: &str) -> Value {
    deployment_body_with(function_id, version_id, status, &[specification_json()])
}

/// A deployment carrying `specifications` in the given order.
pub fn deployment_body_with(
    function_id: &str,
    version_id: &str,
    status: &str,
    specifications: &[Value],
) -> Value {
    json!({
        "deployment": {
            "functionId": function_id,
            "functionVersionId": version_id,
            "ncaId": OWNER_NCA_ID,
            "functionStatus": status,
            "deploymentSpecifications": specifications
        }
    })
}

pub fn authorization_body(function_id: &str, version_id: &str, parties: &[&str]) -> Value {
    let parties: Vec<Value> = parties.iter().map(|p| json!({ "ncaId": p })).collect();
    json!({
        "function": {
            "id": function_id,
            "ncaId": OWNER_NCA_ID,
            "versionId": version_id,
            "authorizedParties": parties
        }
    })
}

pub fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Error response in the `requestStatus` shape.
pub fn request_status_error(status: u16, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "requestStatus": {
            "statusCode": "INVALID_REQUEST",
            "statusDescription": description,
            "requestId": "req-1"
        }
    }))
}

/// Error response in the problem-details shape.
pub fn problem_error(status: u16, detail: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "type": "urn:nvcf:error",
        "title": "Error",
        "status": status,
        "detail": detail,
        "instance": "/nvcf"
    }))
}
