//! Cluster binding through the router

use axum::http::{Method, StatusCode};
use kubemux_core::error::NO_CREDENTIALS_MESSAGE;
use kubemux_core::{ClusterCredentials, ClusterId};
use pretty_assertions::assert_eq;
use tests::fixtures::{inline_credentials, token_credentials, UNREACHABLE_SERVER};
use tests::mocks::{cluster_record, CountingFactory, MockClusterRepository};
use tests::GatewayTestHarness;
use wiremock::MockServer;

use super::{mount_namespaces, namespace_names, request_count};

#[tokio::test]
async fn test_no_cluster_id_uses_default_connection() {
    let harness = GatewayTestHarness::new().await;
    mount_namespaces(&harness.default_api, &["default", "kube-system"]).await;

    let (status, body) = harness.get("/api/v1/namespaces").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(namespace_names(&body), vec!["default", "kube-system"]);
    assert_eq!(harness.repo.get_calls(), 0);
    assert_eq!(harness.factory.builds(), 0);
}

#[tokio::test]
async fn test_empty_cluster_id_uses_default_connection() {
    let harness = GatewayTestHarness::new().await;
    mount_namespaces(&harness.default_api, &["default"]).await;

    let (status, body) = harness.get("/api/v1/namespaces?cluster_id=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(namespace_names(&body), vec!["default"]);
    assert_eq!(harness.repo.get_calls(), 0);
}

#[tokio::test]
async fn test_cluster_requests_share_one_connection() {
    let cluster_api = MockServer::start().await;
    mount_namespaces(&cluster_api, &["prod-a", "prod-b"]).await;
    let repo = MockClusterRepository::new().with_cluster(cluster_record(
        7,
        "prod",
        token_credentials(&cluster_api.uri(), "prod-token"),
    ));
    let harness = GatewayTestHarness::with_repo(repo).await;

    for _ in 0..2 {
        let (status, body) = harness.get("/api/v1/namespaces?cluster_id=7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(namespace_names(&body), vec!["prod-a", "prod-b"]);
    }

    assert_eq!(harness.factory.builds(), 1);
    assert_eq!(harness.repo.get_calls(), 1);
    assert_eq!(request_count(&cluster_api).await, 2);
    assert_eq!(request_count(&harness.default_api).await, 0);
    assert!(harness.manager().is_cached(ClusterId(7)));

    let requests = cluster_api.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer prod-token"
    );
}

#[tokio::test]
async fn test_non_numeric_cluster_id_is_bad_request() {
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness.get("/api/v1/pods?cluster_id=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["message"], "Invalid cluster ID: abc");
    assert!(body.get("data").is_none());
    assert_eq!(harness.repo.get_calls(), 0);
}

#[tokio::test]
async fn test_unknown_cluster_is_not_found() {
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness.get("/api/v1/nodes?cluster_id=999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cluster not found: 999");
    assert_eq!(harness.factory.builds(), 0);
}

#[tokio::test]
async fn test_record_without_credentials_is_bad_request() {
    let repo = MockClusterRepository::new()
        .with_cluster(cluster_record(3, "empty", ClusterCredentials::default()));
    let harness = GatewayTestHarness::with_repo(repo).await;

    let (status, body) = harness.get("/api/v1/namespaces?cluster_id=3").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], NO_CREDENTIALS_MESSAGE);
    assert_eq!(harness.factory.builds(), 0);
}

#[tokio::test]
async fn test_invalid_kubeconfig_is_bad_request() {
    let mut creds = inline_credentials(UNREACHABLE_SERVER);
    creds.config_content = "current-context: nowhere".to_string();
    let repo = MockClusterRepository::new().with_cluster(cluster_record(4, "bad", creds));
    let harness = GatewayTestHarness::with_repo(repo).await;

    let (status, body) = harness.get("/api/v1/namespaces?cluster_id=4").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to build config from content"));
}

#[tokio::test]
async fn test_client_build_failure_is_bad_gateway() {
    let repo = MockClusterRepository::new().with_cluster(cluster_record(
        5,
        "flaky",
        token_credentials(UNREACHABLE_SERVER, "t"),
    ));
    let factory = CountingFactory::new().failing("invalid CA bundle");
    let harness = GatewayTestHarness::with_parts(repo, factory).await;

    let (status, body) = harness.get("/api/v1/namespaces?cluster_id=5").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["message"],
        "Failed to create kubernetes client: invalid CA bundle"
    );

    // Not cached: the next request tries again
    harness.get("/api/v1/namespaces?cluster_id=5").await;
    assert_eq!(harness.factory.builds(), 2);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let harness = GatewayTestHarness::new().await;
    harness.repo.set_failing(true);

    let (status, body) = harness.get("/api/v1/pods?cluster_id=1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
}

#[tokio::test]
async fn test_form_cluster_id_is_bound() {
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness
        .send_form(Method::POST, "/api/v1/namespaces", "name=dev&cluster_id=9")
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], "Cluster not found: 9");
    assert_eq!(harness.repo.get_calls(), 1);
}

#[tokio::test]
async fn test_query_cluster_id_wins_over_form() {
    let cluster_api = MockServer::start().await;
    let repo = MockClusterRepository::new().with_cluster(cluster_record(
        2,
        "lab",
        token_credentials(&cluster_api.uri(), "lab-token"),
    ));
    let harness = GatewayTestHarness::with_repo(repo).await;

    let (status, body) = harness
        .send_form(
            Method::POST,
            "/api/v1/namespaces?cluster_id=2",
            "cluster_id=9",
        )
        .await;

    // Bound to cluster 2; the handler then refuses the form body
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
    assert_eq!(harness.factory.endpoints(), vec![cluster_api.uri()]);
}

#[tokio::test]
async fn test_unmatched_route_is_never_bound() {
    let harness = GatewayTestHarness::new().await;

    let (status, _) = harness.get("/api/v1/widgets?cluster_id=abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(harness.repo.get_calls(), 0);
}

#[tokio::test]
async fn test_health_is_unbound() {
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness.get("/health?cluster_id=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
