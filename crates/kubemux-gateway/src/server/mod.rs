//! Gateway Server
//!
//! Axum router with two route groups:
//!
//! - cluster records (`/api/v1/clusters`), served from the record store
//! - cluster-scoped resources, each request bound to one connection by the
//!   cluster binder before its handler runs

pub mod binder;
mod dependencies;
pub mod handlers;
pub mod logging_middleware;
pub mod response;
mod state;

pub use binder::{BoundTarget, CLUSTER_ID_PARAM};
pub use dependencies::{DependenciesBuilder, GatewayDependencies};
pub use response::{ApiError, ApiJson, ApiQuery, ApiResponse};
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use kubemux_core::{branding, ClusterAppService, ConnectionInvalidator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::pool::ConnectionManager;

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS for browser access
    pub enable_cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: branding::DEFAULT_PORT,
            enable_cors: true,
        }
    }
}

impl GatewayConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

/// KubeMux Gateway Server
///
/// Owns the connection manager and the cluster record service. All
/// external dependencies come in through [`GatewayDependencies`].
pub struct GatewayServer {
    config: GatewayConfig,
    state: AppState,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, dependencies: GatewayDependencies) -> Self {
        info!("[Gateway] Initializing...");

        let manager = ConnectionManager::new(
            dependencies.default_handle,
            dependencies.factory,
            dependencies.cluster_repo.clone(),
        );
        let invalidator: Arc<dyn ConnectionInvalidator> = Arc::new(manager.clone());
        let clusters = Arc::new(ClusterAppService::new(
            dependencies.cluster_repo,
            Some(invalidator),
        ));

        Self {
            config,
            state: AppState {
                manager,
                clusters,
                probe_config: dependencies.factory_config,
            },
        }
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.state.manager
    }

    pub fn cluster_service(&self) -> Arc<ClusterAppService> {
        self.state.clusters.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        let cluster_routes = Router::new()
            .route(
                "/api/v1/clusters",
                get(handlers::clusters::list).post(handlers::clusters::create),
            )
            .route(
                "/api/v1/clusters/test-connection",
                post(handlers::clusters::test_connection),
            )
            .route(
                "/api/v1/clusters/{id}",
                get(handlers::clusters::get)
                    .put(handlers::clusters::update)
                    .delete(handlers::clusters::delete),
            );

        let bound_routes = Router::new()
            .route("/api/v1/dashboard/stats", get(handlers::dashboard::stats))
            .route(
                "/api/v1/namespaces",
                get(handlers::namespaces::list).post(handlers::namespaces::create),
            )
            .route(
                "/api/v1/namespaces/{name}",
                axum::routing::delete(handlers::namespaces::delete),
            )
            .route("/api/v1/nodes", get(handlers::nodes::list))
            .route("/api/v1/nodes/{name}", get(handlers::nodes::get))
            .route("/api/v1/pods", get(handlers::pods::list))
            .route(
                "/api/v1/pods/{name}",
                get(handlers::pods::get).delete(handlers::pods::delete),
            )
            .route("/api/v1/pods/yaml", post(handlers::manifests::create))
            .route("/api/v1/pods/{name}/logs", get(handlers::pods::logs))
            .route("/api/v1/deployments", get(handlers::deployments::list))
            .route(
                "/api/v1/deployments/yaml",
                post(handlers::manifests::create),
            )
            .route(
                "/api/v1/deployments/{name}",
                get(handlers::deployments::get).delete(handlers::deployments::delete),
            )
            .route(
                "/api/v1/deployments/{name}/scale",
                put(handlers::deployments::scale),
            )
            .route(
                "/api/v1/deployments/{name}/restart",
                put(handlers::deployments::restart),
            )
            .route("/api/v1/services", get(handlers::services::list))
            .route("/api/v1/services/yaml", post(handlers::manifests::create))
            .route(
                "/api/v1/services/{name}",
                get(handlers::services::get).delete(handlers::services::delete),
            )
            .route(
                "/api/v1/configmaps",
                get(handlers::configmaps::list).post(handlers::configmaps::create),
            )
            .route(
                "/api/v1/configmaps/{name}",
                get(handlers::configmaps::get)
                    .put(handlers::configmaps::update)
                    .delete(handlers::configmaps::delete),
            )
            .route(
                "/api/v1/secrets",
                get(handlers::secrets::list).post(handlers::secrets::create),
            )
            .route(
                "/api/v1/secrets/{name}",
                get(handlers::secrets::get)
                    .put(handlers::secrets::update)
                    .delete(handlers::secrets::delete),
            )
            // Only matched routes are bound; unknown paths never touch the cache
            .route_layer(middleware::from_fn_with_state(
                self.state.manager.clone(),
                binder::cluster_binder,
            ));

        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .merge(cluster_routes)
            .merge(bound_routes)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(
                logging_middleware::http_logging_middleware,
            ));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Run the gateway server until the listener fails
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr()?;

        info!("[Gateway] Starting on {}", addr);
        info!(
            "[Gateway] CORS: {}",
            if self.config.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );

        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("[Gateway] Ready to accept connections");
        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Start the server in the background
    pub fn spawn(self) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
