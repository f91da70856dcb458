//! Gateway test harness
//!
//! Wires a [`GatewayServer`] to a mock record store, a counting factory and
//! a wiremock API server standing in for the default cluster, then drives
//! the router in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kubemux_gateway::{ConnectionManager, DependenciesBuilder, GatewayConfig, GatewayServer};
use kubemux_kube::{ConnectionDescriptor, ConnectionFactory, FactoryConfig, KubeClientFactory};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

use crate::mocks::{CountingFactory, MockClusterRepository};

pub struct GatewayTestHarness {
    /// Fake API server behind the default connection
    pub default_api: MockServer,
    pub repo: Arc<MockClusterRepository>,
    pub factory: Arc<CountingFactory>,
    server: GatewayServer,
    router: Router,
}

impl GatewayTestHarness {
    pub async fn new() -> Self {
        Self::with_repo(MockClusterRepository::new()).await
    }

    pub async fn with_repo(repo: MockClusterRepository) -> Self {
        Self::with_parts(repo, CountingFactory::new()).await
    }

    pub async fn with_parts(repo: MockClusterRepository, factory: CountingFactory) -> Self {
        let default_api = MockServer::start().await;
        let default_handle = KubeClientFactory::default()
            .build(
                ConnectionDescriptor::for_endpoint(&default_api.uri())
                    .expect("Mock server URI is a valid endpoint"),
            )
            .expect("Failed to build default handle");

        let repo = Arc::new(repo);
        let factory = Arc::new(factory);
        let dependencies = DependenciesBuilder::new()
            .with_cluster_repo(repo.clone())
            .with_factory(factory.clone())
            .with_default_handle(Arc::new(default_handle))
            .with_factory_config(FactoryConfig::default())
            .build()
            .expect("Failed to build dependencies");

        let server = GatewayServer::new(GatewayConfig::default(), dependencies);
        let router = server.build_router();

        Self {
            default_api,
            repo,
            factory,
            server,
            router,
        }
    }

    pub fn manager(&self) -> &ConnectionManager {
        self.server.connection_manager()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };
        self.dispatch(method, uri, "application/json", body).await
    }

    /// Send a url-encoded form body.
    pub async fn send_form(&self, method: Method, uri: &str, form: &str) -> (StatusCode, Value) {
        self.dispatch(
            method,
            uri,
            "application/x-www-form-urlencoded",
            Body::from(form.to_string()),
        )
        .await
    }

    async fn dispatch(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: Body,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .body(body)
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }
}
