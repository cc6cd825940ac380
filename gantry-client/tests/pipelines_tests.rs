//! Integration tests for the pipeline config API using wiremock.

use std::sync::Arc;

use gantry_client::{ClientConfig, ClientError, PIPELINE_CONFIG_MEDIA_TYPE, ServerClient};
use gantry_core::domain::{ExecTaskSpec, JobSpec, PipelineSpec, StageSpec, TaskSpec};
use gantry_core::dto::{CreatePipelineRequest, Material, PipelineConfig};
use gantry_core::reconcile::{ApplyOutcome, PipelineConfigService, ResourceStatus, ServiceError};
use gantry_core::{InMemoryResolver, Reconciler, to_external};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

fn client(server: &MockServer) -> ServerClient {
    let config = ClientConfig::new(server.uri()).with_basic_auth("admin", "secret");
    ServerClient::from_config(&config).unwrap()
}

fn pipeline_body() -> serde_json::Value {
    json!({
        "_links": {"self": {"href": "http://localhost/go/api/admin/pipelines/app"}},
        "group": "default",
        "name": "app",
        "lock_behavior": "none",
        "origin": {"type": "gocd"},
        "materials": [
            {"type": "git", "attributes": {"url": "https://x/repo.git", "branch": "main", "filter": null}}
        ],
        "stages": []
    })
}

fn spec() -> PipelineSpec {
    let mut job = JobSpec::new("j1");
    job.tasks.push(TaskSpec::exec(ExecTaskSpec {
        command: "make".into(),
        ..Default::default()
    }));
    let mut stage = StageSpec::new("s1");
    stage.jobs.push(job);

    let mut spec = PipelineSpec::new("app", "default");
    spec.stages.push(stage);
    spec
}

// =============================================================================
// Get
// =============================================================================

#[tokio::test]
async fn test_get_pipeline_config() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/app"))
        .and(header("Accept", PIPELINE_CONFIG_MEDIA_TYPE))
        .and(header("Authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"abc\"")
                .set_body_json(pipeline_body()),
        )
        .mount(&server)
        .await;

    let found = client(&server).get_pipeline_config("app").await.unwrap().unwrap();

    assert_eq!(found.etag, "\"abc\"");
    assert_eq!(found.value.name.as_deref(), Some("app"));
    match &found.value.materials[0] {
        Material::Git(git) => {
            assert_eq!(git.branch.as_deref(), Some("main"));
            assert!(git.filter.is_none());
        }
        other => panic!("unexpected material: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_missing_pipeline_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let found = client(&server).get_pipeline_config("ghost").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/app"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).get_pipeline_config("app").await.unwrap_err();
    assert!(err.is_server_error());

    let err = ServiceError::from(err);
    assert_eq!(
        err,
        ServiceError::Rejected {
            status: 500,
            message: "boom".into()
        }
    );
}

#[tokio::test]
async fn test_get_escapes_pipeline_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/nightly%20build"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"n1\"")
                .set_body_json(pipeline_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server)
        .get_pipeline_config("nightly build")
        .await
        .unwrap();
    assert_eq!(found.unwrap().etag, "\"n1\"");
}

#[tokio::test]
async fn test_json_error_body_is_unwrapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/app"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Validation failed."})),
        )
        .mount(&server)
        .await;

    let err = client(&server).get_pipeline_config("app").await.unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(
        ServiceError::from(err),
        ServiceError::Rejected {
            status: 422,
            message: "Validation failed.".into()
        }
    );
}

#[tokio::test]
async fn test_get_without_etag_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pipeline_body()))
        .mount(&server)
        .await;

    let err = client(&server).get_pipeline_config("app").await.unwrap_err();
    assert!(matches!(err, ClientError::ParseError(_)));
}

#[tokio::test]
async fn test_get_malformed_task_payload_fails_whole_document() {
    let server = MockServer::start().await;

    let mut body = pipeline_body();
    body["stages"] = json!([{
        "name": "s1",
        "jobs": [{
            "name": "j1",
            "tasks": [{"type": "exec", "attributes": {"command": 42}}]
        }]
    }]);

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/app"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"abc\"")
                .set_body_json(body),
        )
        .mount(&server)
        .await;

    let err = client(&server).get_pipeline_config("app").await.unwrap_err();
    assert!(matches!(err, ClientError::Codec(_)));
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_wraps_group_and_pipeline() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/go/api/admin/pipelines"))
        .and(header("Accept", PIPELINE_CONFIG_MEDIA_TYPE))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "group": "default",
            "pipeline": {"name": "app", "lock_behavior": "none"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"v1\"")
                .set_body_json(pipeline_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = CreatePipelineRequest::new(to_external(&spec(), None).unwrap());
    let created = client(&server).create_pipeline_config(&request).await.unwrap();
    assert_eq!(created.etag, "\"v1\"");
}

#[tokio::test]
async fn test_create_in_missing_group() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/go/api/admin/pipelines"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let request = CreatePipelineRequest::new(to_external(&spec(), None).unwrap());
    let err = client(&server).create_pipeline_config(&request).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("pipeline group 'default'"));
}

// =============================================================================
// Update and delete
// =============================================================================

#[tokio::test]
async fn test_update_sends_if_match() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/go/api/admin/pipelines/app"))
        .and(header("If-Match", "\"v1\""))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"v2\"")
                .set_body_json(pipeline_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = to_external(&spec(), None).unwrap();
    let updated = client(&server)
        .update_pipeline_config("\"v1\"", &config)
        .await
        .unwrap();
    assert_eq!(updated.etag, "\"v2\"");
}

#[tokio::test]
async fn test_stale_update_is_a_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/go/api/admin/pipelines/app"))
        .respond_with(ResponseTemplate::new(412).set_body_string("stale"))
        .mount(&server)
        .await;

    let client = client(&server);
    let config = to_external(&spec(), None).unwrap();

    let err = client.update_pipeline_config("\"v0\"", &config).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));

    let err = PipelineConfigService::update(&client, "\"v0\"", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_update_without_name_is_rejected_locally() {
    let server = MockServer::start().await;

    let err = client(&server)
        .update_pipeline_config("\"v1\"", &PipelineConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_delete_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/go/api/admin/pipelines/app"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("If-Match", "\"v3\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri()).with_bearer_token("abc");
    let client = ServerClient::from_config(&config).unwrap();
    client.delete_pipeline_config("app", Some("\"v3\"")).await.unwrap();
}

// =============================================================================
// Reconciler over HTTP
// =============================================================================

#[tokio::test]
async fn test_apply_creates_missing_pipeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/go/api/admin/pipelines/app"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/go/api/admin/pipelines"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"v1\"")
                .set_body_json(pipeline_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = Reconciler::new(
        Arc::new(client(&server)),
        Arc::new(InMemoryResolver::new()),
    );
    let mut status = ResourceStatus::default();

    let outcome = reconciler.apply(&spec(), &mut status).await.unwrap();
    assert_eq!(outcome, ApplyOutcome::Created);
    assert_eq!(status.etag.as_deref(), Some("\"v1\""));
    assert_eq!(status.external_name.as_deref(), Some("app"));
}
