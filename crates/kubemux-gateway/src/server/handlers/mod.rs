//! HTTP handlers for the gateway server

pub mod clusters;
pub mod configmaps;
pub mod dashboard;
pub mod deployments;
pub mod manifests;
pub mod namespaces;
pub mod nodes;
pub mod pods;
pub mod secrets;
pub mod services;

use axum::response::Json;
use kubemux_core::branding;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::response::ApiError;

/// Result type shared by every handler
pub type ApiResult<T> = Result<T, ApiError>;

pub use crate::services::DEFAULT_NAMESPACE;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// `?namespace=` for namespaced routes. Absent means `default`; an empty
/// value on a list route means every namespace.
#[derive(Debug, Deserialize)]
pub struct NamespaceQuery {
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl NamespaceQuery {
    /// Namespace for a single-object route, where empty means `default`.
    pub fn object_namespace(&self) -> &str {
        object_namespace(&self.namespace)
    }
}

/// Single objects always live in one namespace; empty falls back to `default`.
pub fn object_namespace(namespace: &str) -> &str {
    if namespace.is_empty() {
        DEFAULT_NAMESPACE
    } else {
        namespace
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    debug!("[Gateway] Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: branding::VERSION.to_string(),
    })
}
