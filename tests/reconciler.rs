// ABOUTME: Integration tests for the cloud function resource lifecycle.
// ABOUTME: Create, read, update, delete, import, and apply against a mock control plane.

mod support;

use std::collections::BTreeSet;

use nvcf::api::FunctionStatus;
use nvcf::config::FunctionSpec;
use nvcf::model::{DeploymentState, FunctionState};
use nvcf::reconcile::{ChangePlan, PlannedAction, ResourceError, ResourceErrorKind};
use nvcf::types::{FunctionId, NcaId, VersionId};
use support::fixtures::{DEPLOYMENT_YAML, deployed_spec, spec};
use support::mock_api::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Mock helpers
// =============================================================================

async fn mount_create_function(server: &MockServer, expect: u64) {
    Mock::given(method("POST"))
        .and(path(functions_path()))
        .respond_with(ok(function_body(FUNCTION_ID, VERSION_ID)))
        .expect(expect)
        .mount(server)
        .await;
}

async fn mount_get_version(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(version_path(FUNCTION_ID, VERSION_ID)))
        .respond_with(ok(function_body(FUNCTION_ID, VERSION_ID)))
        .mount(server)
        .await;
}

async fn mount_get_authorization(server: &MockServer, parties: &[&str]) {
    Mock::given(method("GET"))
        .and(path(authorization_path(FUNCTION_ID, VERSION_ID)))
        .respond_with(ok(authorization_body(FUNCTION_ID, VERSION_ID, parties)))
        .mount(server)
        .await;
}

async fn mount_unauthorize(server: &MockServer, expect: u64) {
    Mock::given(method("DELETE"))
        .and(path(authorization_path(FUNCTION_ID, VERSION_ID)))
        .respond_with(ok(authorization_body(FUNCTION_ID, VERSION_ID, &[])))
        .expect(expect)
        .mount(server)
        .await;
}

async fn mount_submit_deployment(server: &MockServer, verb: &str, expect: u64) {
    Mock::given(method(verb))
        .and(path(deployment_path(FUNCTION_ID, VERSION_ID)))
        .respond_with(ok(deployment_body(FUNCTION_ID, VERSION_ID, "DEPLOYING")))
        .expect(expect)
        .mount(server)
        .await;
}

/// Each status but the last is served once; the last repeats.
async fn mount_statuses(server: &MockServer, statuses: &[&str]) {
    for (i, status) in statuses.iter().enumerate() {
        let mock = Mock::given(method("GET"))
            .and(path(deployment_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(ok(deployment_body(FUNCTION_ID, VERSION_ID, status)));
        let mock = if i + 1 < statuses.len() {
            mock.up_to_n_times(1)
        } else {
            mock
        };
        mock.mount(server).await;
    }
}

async fn mount_delete_version(server: &MockServer, response: ResponseTemplate, expect: u64) {
    Mock::given(method("DELETE"))
        .and(path(version_path(FUNCTION_ID, VERSION_ID)))
        .respond_with(response)
        .expect(expect)
        .mount(server)
        .await;
}

/// What a successful create of `spec` leaves behind.
fn deployed_state(spec: &FunctionSpec) -> FunctionState {
    let mut state = FunctionState::planned(spec);
    state.function_id = FunctionId::new(FUNCTION_ID);
    state.version_id = VersionId::new(VERSION_ID);
    state.nca_id = Some(NcaId::new(OWNER_NCA_ID));
    state.deployment_specifications = spec
        .deployment_specifications
        .iter()
        .map(|d| DeploymentState {
            backend: d.backend.clone(),
            instance_type: d.instance_type.clone(),
            gpu: d.gpu.clone(),
            min_instances: d.min_instances,
            max_instances: d.max_instances,
            max_request_concurrency: d.max_request_concurrency,
            configuration: None,
        })
        .collect();
    if !state.deployment_specifications.is_empty() {
        state.function_status = Some(FunctionStatus::Active);
    }
    state
}

// =============================================================================
// Create
// =============================================================================

mod create {
    use super::*;

    #[tokio::test]
    async fn deploying_then_active_succeeds() {
        support::init_tracing();
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;
        mount_unauthorize(&server, 0).await;
        mount_submit_deployment(&server, "POST", 1).await;
        mount_statuses(&server, &["DEPLOYING", "ACTIVE"]).await;
        mount_delete_version(&server, ResponseTemplate::new(204), 0).await;

        let state = resource(&server).create(&deployed_spec()).await.unwrap();

        assert_eq!(state.function_id, FunctionId::new(FUNCTION_ID));
        assert_eq!(state.version_id, VersionId::new(VERSION_ID));
        assert_eq!(state.nca_id, Some(NcaId::new(OWNER_NCA_ID)));
        assert_eq!(state.function_status, Some(FunctionStatus::Active));
        assert_eq!(state.deployment_specifications.len(), 1);
        assert_eq!(state.deployment_specifications[0].min_instances, 1);
        assert_eq!(state.deployment_specifications[0].max_instances, 2);
        assert_eq!(state.deployment_specifications[0].gpu, "L40");
    }

    #[tokio::test]
    async fn specifications_keep_input_order() {
        let server = MockServer::start().await;
        let gfn = json!({
            "gpu": "L40",
            "backend": "GFN",
            "instanceType": "gl40_1.br20_2xlarge",
            "minInstances": 1,
            "maxInstances": 2,
            "maxRequestConcurrency": 4
        });
        let oci = json!({
            "gpu": "H100",
            "backend": "OCI",
            "instanceType": "OCI.GPU.H100_1x",
            "minInstances": 0,
            "maxInstances": 3,
            "maxRequestConcurrency": 8
        });
        let submitted = [gfn.clone(), oci.clone()];

        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;
        Mock::given(method("POST"))
            .and(path(deployment_path(FUNCTION_ID, VERSION_ID)))
            .and(body_partial_json(json!({ "deploymentSpecifications": [gfn, oci] })))
            .respond_with(ok(deployment_body_with(
                FUNCTION_ID,
                VERSION_ID,
                "DEPLOYING",
                &submitted,
            )))
            .expect(1)
            .mount(&server)
            .await;
        mount_statuses(&server, &["ACTIVE"]).await;

        let desired = spec(
            r#"
deployment_specifications:
  - backend: GFN
    instance_type: gl40_1.br20_2xlarge
    gpu: L40
    min_instances: 1
    max_instances: 2
    max_request_concurrency: 4
  - backend: OCI
    instance_type: OCI.GPU.H100_1x
    gpu: H100
    min_instances: 0
    max_instances: 3
    max_request_concurrency: 8
"#,
        );
        let state = resource(&server).create(&desired).await.unwrap();

        assert_eq!(
            state.deployment_specifications,
            deployed_state(&desired).deployment_specifications
        );
        assert_eq!(state.deployment_specifications[1].gpu, "H100");
    }

    #[tokio::test]
    async fn oversized_timeout_does_not_overflow() {
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "POST", 1).await;
        mount_statuses(&server, &["ACTIVE"]).await;

        let desired = spec(&format!(
            "timeouts:\n  create: 300000000000years\n{DEPLOYMENT_YAML}"
        ));
        let state = resource(&server).create(&desired).await.unwrap();

        assert_eq!(state.function_status, Some(FunctionStatus::Active));
    }

    #[tokio::test]
    async fn failed_deployment_deletes_new_version() {
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "POST", 1).await;
        mount_statuses(&server, &["FAILED"]).await;
        mount_delete_version(&server, ResponseTemplate::new(204), 1).await;

        let err = resource(&server)
            .create(&deployed_spec())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ResourceErrorKind::DeploymentFailed);
        assert!(err.to_string().contains("FAILED"));
    }

    #[tokio::test]
    async fn keep_failed_resource_skips_delete() {
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "POST", 1).await;
        mount_statuses(&server, &["FAILED"]).await;
        mount_delete_version(&server, ResponseTemplate::new(204), 0).await;

        let desired = spec(&format!("keep_failed_resource: true\n{DEPLOYMENT_YAML}"));
        let err = resource(&server).create(&desired).await.unwrap_err();

        assert_eq!(err.kind(), ResourceErrorKind::DeploymentFailed);
    }

    #[tokio::test]
    async fn failed_cleanup_reports_both_errors() {
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "POST", 1).await;
        mount_statuses(&server, &["FAILED"]).await;
        mount_delete_version(
            &server,
            request_status_error(500, "internal error during delete"),
            1,
        )
        .await;

        let err = resource(&server)
            .create(&deployed_spec())
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceError::Rollback { .. }));
        let message = err.to_string();
        assert!(message.contains("FAILED"));
        assert!(message.contains("internal error during delete"));
        assert_eq!(err.kind(), ResourceErrorKind::DeploymentFailed);
    }

    #[tokio::test]
    async fn zero_specifications_skip_deployment_and_waiter() {
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "POST", 0).await;
        Mock::given(method("GET"))
            .and(path(deployment_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(ok(deployment_body(FUNCTION_ID, VERSION_ID, "ACTIVE")))
            .expect(0)
            .mount(&server)
            .await;

        let state = resource(&server).create(&spec("")).await.unwrap();

        assert!(state.deployment_specifications.is_empty());
        assert_eq!(state.function_status, None);
    }

    #[tokio::test]
    async fn authorizes_desired_parties() {
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(authorization_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(ok(authorization_body(
                FUNCTION_ID,
                VERSION_ID,
                &["nca-a", "nca-b"],
            )))
            .expect(1)
            .mount(&server)
            .await;

        let desired = spec("authorized_parties: [nca-a, nca-b]\n");
        let state = resource(&server).create(&desired).await.unwrap();

        assert_eq!(
            state.authorized_parties,
            BTreeSet::from([NcaId::new("nca-a"), NcaId::new("nca-b")])
        );
    }

    #[tokio::test]
    async fn adds_version_to_existing_function() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(versions_path(FUNCTION_ID)))
            .respond_with(ok(function_body(FUNCTION_ID, VERSION_ID)))
            .expect(1)
            .mount(&server)
            .await;
        mount_get_authorization(&server, &[]).await;

        let desired = spec(&format!("function_id: {FUNCTION_ID}\n"));
        let state = resource(&server).create(&desired).await.unwrap();

        assert_eq!(state.parent_function_id, Some(FunctionId::new(FUNCTION_ID)));
    }

    #[tokio::test]
    async fn invalid_configuration_sends_no_request() {
        let server = MockServer::start().await;

        let desired = spec(
            r#"
deployment_specifications:
  - backend: GFN
    instance_type: gl40_1.br20_2xlarge
    gpu: L40
    min_instances: 1
    max_instances: 1
    max_request_concurrency: 1
    configuration: "{not json"
"#,
        );
        let err = resource(&server).create(&desired).await.unwrap_err();

        assert_eq!(err.kind(), ResourceErrorKind::Validation);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejection_names_the_operation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(functions_path()))
            .respond_with(request_status_error(400, "inferenceUrl is invalid"))
            .mount(&server)
            .await;

        let err = resource(&server)
            .create(&deployed_spec())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to create cloud function: inferenceUrl is invalid"
        );
        assert_eq!(err.kind(), ResourceErrorKind::Remote);
    }
}

// =============================================================================
// Read
// =============================================================================

mod read {
    use super::*;

    #[tokio::test]
    async fn missing_version_is_gone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(version_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(problem_error(404, "Function not found"))
            .mount(&server)
            .await;

        let prior = deployed_state(&deployed_spec());
        let state = resource(&server).read(&prior).await.unwrap();

        assert!(state.is_none());
    }

    #[tokio::test]
    async fn reading_twice_gives_identical_state() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_statuses(&server, &["ACTIVE"]).await;
        mount_get_authorization(&server, &["nca-a"]).await;

        let resource = resource(&server);
        let prior = deployed_state(&deployed_spec());
        let first = resource.read(&prior).await.unwrap().unwrap();
        let second = resource.read(&first).await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.authorized_parties, BTreeSet::from([NcaId::new("nca-a")]));
    }

    #[tokio::test]
    async fn missing_deployment_clears_specifications() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        Mock::given(method("GET"))
            .and(path(deployment_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(problem_error(404, "failed to find function deployment"))
            .mount(&server)
            .await;
        mount_get_authorization(&server, &[]).await;

        let prior = deployed_state(&deployed_spec());
        let state = resource(&server).read(&prior).await.unwrap().unwrap();

        assert!(state.deployment_specifications.is_empty());
        assert_eq!(state.function_status, None);
    }

    #[tokio::test]
    async fn keeps_write_only_secret_names() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_statuses(&server, &["ACTIVE"]).await;
        mount_get_authorization(&server, &[]).await;

        let desired = spec(&format!(
            "secrets:\n  - name: token\n    value: abc\n{DEPLOYMENT_YAML}"
        ));
        let prior = deployed_state(&desired);
        let state = resource(&server).read(&prior).await.unwrap().unwrap();

        assert!(state.secret_names.contains("token"));
    }
}

// =============================================================================
// Update
// =============================================================================

mod update {
    use super::*;

    #[tokio::test]
    async fn tag_change_updates_metadata_once() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(metadata_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(ok(function_body_with_tags(FUNCTION_ID, VERSION_ID, &["prod"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(version_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(ok(function_body_with_tags(FUNCTION_ID, VERSION_ID, &["prod"])))
            .mount(&server)
            .await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "PUT", 1).await;
        mount_statuses(&server, &["ACTIVE"]).await;

        let prior = deployed_state(&deployed_spec());
        let desired = spec(&format!("tags: [prod]\n{DEPLOYMENT_YAML}"));

        let change = ChangePlan::between(&desired, Some(&prior));
        assert_eq!(change.action(), PlannedAction::UpdateInPlace);
        assert_eq!(change.changed_fields(), &["tags"]);

        let state = resource(&server).update(&desired, &prior).await.unwrap();

        assert_eq!(state.tags, BTreeSet::from(["prod".to_string()]));
        assert_eq!(state.function_status, Some(FunctionStatus::Active));
    }

    #[tokio::test]
    async fn clearing_parties_unauthorizes_once() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_get_authorization(&server, &["nca-a"]).await;
        mount_unauthorize(&server, 1).await;
        mount_submit_deployment(&server, "PUT", 1).await;
        mount_statuses(&server, &["ACTIVE"]).await;

        let mut prior = deployed_state(&deployed_spec());
        prior.authorized_parties = BTreeSet::from([NcaId::new("nca-a")]);

        let state = resource(&server)
            .update(&deployed_spec(), &prior)
            .await
            .unwrap();

        assert!(state.authorized_parties.is_empty());
    }

    #[tokio::test]
    async fn clearing_already_empty_parties_sends_nothing() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_get_authorization(&server, &[]).await;
        mount_unauthorize(&server, 0).await;
        mount_submit_deployment(&server, "PUT", 1).await;
        mount_statuses(&server, &["ACTIVE"]).await;

        let prior = deployed_state(&deployed_spec());
        resource(&server)
            .update(&deployed_spec(), &prior)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn removing_all_specifications_deletes_deployment() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_get_authorization(&server, &[]).await;
        Mock::given(method("DELETE"))
            .and(path(deployment_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(ok(deployment_body(FUNCTION_ID, VERSION_ID, "INACTIVE")))
            .expect(1)
            .mount(&server)
            .await;
        mount_submit_deployment(&server, "PUT", 0).await;

        let prior = deployed_state(&deployed_spec());
        let state = resource(&server).update(&spec(""), &prior).await.unwrap();

        assert!(state.deployment_specifications.is_empty());
        assert_eq!(state.function_status, None);
    }

    #[tokio::test]
    async fn first_specification_creates_deployment() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "POST", 1).await;
        mount_submit_deployment(&server, "PUT", 0).await;
        mount_statuses(&server, &["DEPLOYING", "ACTIVE"]).await;

        let prior = deployed_state(&spec(""));
        let state = resource(&server)
            .update(&deployed_spec(), &prior)
            .await
            .unwrap();

        assert_eq!(state.deployment_specifications.len(), 1);
        assert_eq!(state.function_status, Some(FunctionStatus::Active));
    }

    #[tokio::test]
    async fn oversized_timeout_does_not_overflow() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "PUT", 1).await;
        mount_statuses(&server, &["ACTIVE"]).await;

        let prior = deployed_state(&deployed_spec());
        let desired = spec(&format!(
            "timeouts:\n  update: 300000000000years\n{DEPLOYMENT_YAML}"
        ));
        let state = resource(&server).update(&desired, &prior).await.unwrap();

        assert_eq!(state.function_status, Some(FunctionStatus::Active));
    }

    #[tokio::test]
    async fn failed_update_keeps_version() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_get_authorization(&server, &[]).await;
        mount_submit_deployment(&server, "PUT", 1).await;
        mount_statuses(&server, &["FAILED"]).await;
        mount_delete_version(&server, ResponseTemplate::new(204), 0).await;

        let prior = deployed_state(&deployed_spec());
        let err = resource(&server)
            .update(&deployed_spec(), &prior)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ResourceErrorKind::DeploymentFailed);
    }
}

// =============================================================================
// Delete and import
// =============================================================================

mod delete_and_import {
    use super::*;

    #[tokio::test]
    async fn delete_removes_version() {
        let server = MockServer::start().await;
        mount_delete_version(&server, ResponseTemplate::new(204), 1).await;

        let prior = deployed_state(&deployed_spec());
        resource(&server).delete(&prior).await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_version_fails() {
        let server = MockServer::start().await;
        mount_delete_version(&server, problem_error(404, "Function not found"), 1).await;

        let prior = deployed_state(&deployed_spec());
        let err = resource(&server).delete(&prior).await.unwrap_err();

        assert_eq!(err.kind(), ResourceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn import_reads_the_version() {
        let server = MockServer::start().await;
        mount_get_version(&server).await;
        mount_statuses(&server, &["ACTIVE"]).await;
        mount_get_authorization(&server, &[]).await;

        let state = resource(&server)
            .import(&format!("{FUNCTION_ID},{VERSION_ID}"))
            .await
            .unwrap();

        assert_eq!(state.function_name, "echo");
        assert_eq!(state.inference_url, "/echo");
        assert_eq!(state.function_status, Some(FunctionStatus::Active));
        assert_eq!(state.import_id(), format!("{FUNCTION_ID},{VERSION_ID}"));
    }

    #[tokio::test]
    async fn malformed_import_id_sends_no_request() {
        let server = MockServer::start().await;

        let err = resource(&server).import("only-one-part").await.unwrap_err();

        assert_eq!(err.kind(), ResourceErrorKind::Validation);
        assert!(err.to_string().contains("function_id,version_id"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_of_missing_version_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(version_path(FUNCTION_ID, VERSION_ID)))
            .respond_with(problem_error(404, "Function not found"))
            .mount(&server)
            .await;

        let err = resource(&server)
            .import(&format!("{FUNCTION_ID},{VERSION_ID}"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceError::VersionNotFound { .. }));
    }
}

// =============================================================================
// Apply
// =============================================================================

mod apply {
    use super::*;

    #[tokio::test]
    async fn unchanged_definition_is_a_no_op() {
        let server = MockServer::start().await;

        let desired = deployed_spec();
        let prior = deployed_state(&desired);
        let outcome = resource(&server)
            .apply(&desired, Some(&prior))
            .await
            .unwrap();

        assert_eq!(outcome.action, PlannedAction::NoOp);
        assert_eq!(outcome.state, prior);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_prior_state_creates() {
        let server = MockServer::start().await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;

        let outcome = resource(&server).apply(&spec(""), None).await.unwrap();

        assert_eq!(outcome.action, PlannedAction::Create);
        assert_eq!(outcome.state.version_id, VersionId::new(VERSION_ID));
    }

    #[tokio::test]
    async fn image_change_replaces_the_version() {
        let server = MockServer::start().await;
        mount_delete_version(&server, ResponseTemplate::new(204), 1).await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;

        let prior = deployed_state(&spec(""));
        let desired = FunctionSpec::from_yaml(
            r#"
function_name: echo
container:
  image: nvcr.io/acme/echo:2
inference_url: /echo
inference_port: 8000
"#,
        )
        .unwrap();

        let outcome = resource(&server)
            .apply(&desired, Some(&prior))
            .await
            .unwrap();

        assert_eq!(outcome.action, PlannedAction::Replace);
        assert_eq!(outcome.changed_fields, vec!["container_image"]);
    }

    fn replacement_spec() -> FunctionSpec {
        FunctionSpec::from_yaml(
            r#"
function_name: echo
container:
  image: nvcr.io/acme/echo:2
inference_url: /echo
inference_port: 8000
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn failed_create_after_delete_reports_deleted_version() {
        let server = MockServer::start().await;
        mount_delete_version(&server, ResponseTemplate::new(204), 1).await;
        Mock::given(method("POST"))
            .and(path(functions_path()))
            .respond_with(request_status_error(400, "quota exceeded"))
            .expect(1)
            .mount(&server)
            .await;

        let prior = deployed_state(&spec(""));
        let err = resource(&server)
            .apply(&replacement_spec(), Some(&prior))
            .await
            .unwrap_err();

        assert!(err.replaced_version_deleted());
        assert_eq!(err.kind(), ResourceErrorKind::Remote);
        let message = err.to_string();
        assert!(message.contains(VERSION_ID));
        assert!(message.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn replacement_of_already_deleted_version_creates() {
        let server = MockServer::start().await;
        mount_delete_version(&server, problem_error(404, "Function not found"), 1).await;
        mount_create_function(&server, 1).await;
        mount_get_authorization(&server, &[]).await;

        let prior = deployed_state(&spec(""));
        let outcome = resource(&server)
            .apply(&replacement_spec(), Some(&prior))
            .await
            .unwrap();

        assert_eq!(outcome.action, PlannedAction::Replace);
        assert_eq!(outcome.state.version_id, VersionId::new(VERSION_ID));
    }

    #[tokio::test]
    async fn delete_failure_during_replacement_keeps_prior() {
        let server = MockServer::start().await;
        mount_delete_version(&server, request_status_error(500, "backend down"), 1).await;
        mount_create_function(&server, 0).await;

        let prior = deployed_state(&spec(""));
        let err = resource(&server)
            .apply(&replacement_spec(), Some(&prior))
            .await
            .unwrap_err();

        assert!(!err.replaced_version_deleted());
        assert!(err.to_string().contains("backend down"));
    }

    #[tokio::test]
    async fn invalid_replacement_leaves_old_version() {
        let server = MockServer::start().await;
        mount_delete_version(&server, ResponseTemplate::new(204), 0).await;

        let prior = deployed_state(&spec(""));
        let desired = FunctionSpec::from_yaml(
            r#"
function_name: echo
container:
  image: nvcr.io/acme/echo:2
inference_url: /echo
inference_port: 8000
deployment_specifications:
  - backend: GFN
    instance_type: gl40_1.br20_2xlarge
    gpu: L40
    min_instances: 3
    max_instances: 1
    max_request_concurrency: 1
"#,
        )
        .unwrap();

        let err = resource(&server)
            .apply(&desired, Some(&prior))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ResourceErrorKind::Validation);
    }
}
