//! Cluster record endpoints

use axum::http::{Method, StatusCode};
use kubemux_core::error::NO_CREDENTIALS_MESSAGE;
use kubemux_core::ClusterId;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::GatewayTestHarness;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{mount_namespaces, namespace_names, request_count};

async fn create_cluster(harness: &GatewayTestHarness, name: &str, server: &str) -> u64 {
    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/clusters",
            Some(json!({"name": name, "server_url": server, "token": "t"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_u64().expect("id in response")
}

#[tokio::test]
async fn test_create_get_list() {
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/clusters",
            Some(json!({
                "name": "prod",
                "description": "primary",
                "server_url": "https://10.0.0.1:6443",
                "token": "s3cret"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["name"], "prod");
    assert_eq!(body["data"]["status"], "active");
    assert!(body["data"].get("token").is_none());
    let id = body["data"]["id"].as_u64().unwrap();

    let (status, body) = harness.get(&format!("/api/v1/clusters/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "primary");
    assert!(body["data"].get("token").is_none());

    let (status, body) = harness.get("/api/v1/clusters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_validation() {
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness
        .send(Method::POST, "/api/v1/clusters", Some(json!({"name": "bare"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], NO_CREDENTIALS_MESSAGE);

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/clusters",
            Some(json!({"server_url": "https://k", "token": "t"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cluster name is required");

    let (status, body) = harness
        .send(Method::POST, "/api/v1/clusters", Some(json!(["not", "an", "object"])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let harness = GatewayTestHarness::new().await;
    create_cluster(&harness, "prod", "https://k").await;

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/clusters",
            Some(json!({"name": "prod", "server_url": "https://k", "token": "t"})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn test_bad_and_missing_ids() {
    let harness = GatewayTestHarness::new().await;

    let (status, _) = harness.get("/api/v1/clusters/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = harness.get("/api/v1/clusters/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cluster not found: 42");

    let (status, _) = harness.send(Method::DELETE, "/api/v1/clusters/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_switches_connection_on_next_request() {
    let old_api = MockServer::start().await;
    let new_api = MockServer::start().await;
    mount_namespaces(&old_api, &["old"]).await;
    mount_namespaces(&new_api, &["new"]).await;

    let harness = GatewayTestHarness::new().await;
    let id = create_cluster(&harness, "moving", &old_api.uri()).await;
    let scoped = format!("/api/v1/namespaces?cluster_id={}", id);

    let (_, body) = harness.get(&scoped).await;
    assert_eq!(namespace_names(&body), vec!["old"]);

    let (status, _) = harness
        .send(
            Method::PUT,
            &format!("/api/v1/clusters/{}", id),
            Some(json!({"name": "moving", "server_url": new_api.uri(), "token": "t2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!harness.manager().is_cached(ClusterId(id as u32)));
    assert!(harness.manager().pending_ids().is_empty());

    let (_, body) = harness.get(&scoped).await;
    assert_eq!(namespace_names(&body), vec!["new"]);
    assert_eq!(request_count(&old_api).await, 1);
    assert_eq!(harness.factory.builds(), 2);
}

#[tokio::test]
async fn test_delete_drops_connection() {
    let api = MockServer::start().await;
    mount_namespaces(&api, &["default"]).await;

    let harness = GatewayTestHarness::new().await;
    let id = create_cluster(&harness, "doomed", &api.uri()).await;
    let scoped = format!("/api/v1/namespaces?cluster_id={}", id);

    let (status, _) = harness.get(&scoped).await;
    assert_eq!(status, StatusCode::OK);
    assert!(harness.manager().is_cached(ClusterId(id as u32)));

    let (status, body) = harness
        .send(Method::DELETE, &format!("/api/v1/clusters/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert!(harness.manager().is_empty());
    assert!(harness.manager().pending_ids().is_empty());

    let (status, _) = harness.get(&scoped).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_probe_without_credentials_reports_failure() {
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness
        .send(Method::POST, "/api/v1/clusters/test-connection", Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], false);
    assert_eq!(body["data"]["message"], NO_CREDENTIALS_MESSAGE);
    assert_eq!(harness.factory.builds(), 0);
}

#[tokio::test]
async fn test_probe_reachable_cluster() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "major": "1",
            "minor": "30",
            "gitVersion": "v1.30.2",
            "gitCommit": "39683505b630ff2121012f3c5b16215a1449d5ed",
            "gitTreeState": "clean",
            "buildDate": "2024-06-11T20:21:00Z",
            "goVersion": "go1.22.4",
            "compiler": "gc",
            "platform": "linux/amd64"
        })))
        .expect(1)
        .mount(&api)
        .await;
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/clusters/test-connection",
            Some(json!({"server_url": api.uri(), "token": "t"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["version"], "v1.30.2");
    // Probes never touch the cache
    assert!(harness.manager().is_empty());
}

#[tokio::test]
async fn test_probe_rejected_credentials() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "kind": "Status",
            "status": "Failure",
            "message": "Unauthorized",
            "reason": "Unauthorized",
            "code": 401
        })))
        .mount(&api)
        .await;
    let harness = GatewayTestHarness::new().await;

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/clusters/test-connection",
            Some(json!({"server_url": api.uri(), "token": "wrong"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], false);
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Unauthorized"));
}
