//! Node endpoints

use axum::extract::Path;

use super::ApiResult;
use crate::server::response::ApiResponse;
use crate::services::{ClusterServices, NodeInfo};

/// `GET /api/v1/nodes`
pub async fn list(cluster: ClusterServices) -> ApiResult<ApiResponse<Vec<NodeInfo>>> {
    Ok(ApiResponse::ok(cluster.nodes().list().await?))
}

/// `GET /api/v1/nodes/{name}`
pub async fn get(
    cluster: ClusterServices,
    Path(name): Path<String>,
) -> ApiResult<ApiResponse<NodeInfo>> {
    Ok(ApiResponse::ok(cluster.nodes().get(&name).await?))
}
