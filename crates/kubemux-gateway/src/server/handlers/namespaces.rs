//! Namespace endpoints

use axum::extract::Path;
use serde::Deserialize;

use super::ApiResult;
use crate::server::response::{ApiError, ApiJson, ApiResponse};
use crate::services::{ClusterServices, NamespaceInfo};

#[derive(Debug, Deserialize)]
pub struct CreateNamespaceRequest {
    #[serde(default)]
    pub name: String,
}

/// `GET /api/v1/namespaces`
pub async fn list(cluster: ClusterServices) -> ApiResult<ApiResponse<Vec<NamespaceInfo>>> {
    Ok(ApiResponse::ok(cluster.namespaces().list().await?))
}

/// `POST /api/v1/namespaces`
pub async fn create(
    cluster: ClusterServices,
    ApiJson(req): ApiJson<CreateNamespaceRequest>,
) -> ApiResult<ApiResponse<()>> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Namespace name is required"));
    }
    cluster.namespaces().create(name).await?;
    Ok(ApiResponse::done())
}

/// `DELETE /api/v1/namespaces/{name}`
pub async fn delete(
    cluster: ClusterServices,
    Path(name): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    cluster.namespaces().delete(&name).await?;
    Ok(ApiResponse::done())
}
