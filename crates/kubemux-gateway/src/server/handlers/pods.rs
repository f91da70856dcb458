//! Pod endpoints

use axum::extract::Path;
use serde::Deserialize;

use super::{default_namespace, object_namespace, ApiResult, NamespaceQuery};
use crate::server::response::{ApiQuery, ApiResponse};
use crate::services::{ClusterServices, PodInfo, DEFAULT_TAIL_LINES};

fn default_tail_lines() -> i64 {
    DEFAULT_TAIL_LINES
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default = "default_tail_lines")]
    pub tail_lines: i64,
}

/// `GET /api/v1/pods`
pub async fn list(
    cluster: ClusterServices,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<Vec<PodInfo>>> {
    Ok(ApiResponse::ok(cluster.pods().list(&query.namespace).await?))
}

/// `GET /api/v1/pods/{name}`
pub async fn get(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<PodInfo>> {
    let pod = cluster.pods().get(query.object_namespace(), &name).await?;
    Ok(ApiResponse::ok(pod))
}

/// `DELETE /api/v1/pods/{name}`
pub async fn delete(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<()>> {
    cluster.pods().delete(query.object_namespace(), &name).await?;
    Ok(ApiResponse::done())
}

/// `GET /api/v1/pods/{name}/logs`
pub async fn logs(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<LogsQuery>,
) -> ApiResult<ApiResponse<String>> {
    let namespace = object_namespace(&query.namespace);
    let logs = cluster
        .pods()
        .logs(namespace, &name, query.container.as_deref(), query.tail_lines)
        .await?;
    Ok(ApiResponse::ok(logs))
}
