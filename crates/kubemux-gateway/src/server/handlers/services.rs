//! Service (svc) endpoints

use axum::extract::Path;

use super::{ApiResult, NamespaceQuery};
use crate::server::response::{ApiQuery, ApiResponse};
use crate::services::{ClusterServices, ServiceInfo};

/// `GET /api/v1/services`
pub async fn list(
    cluster: ClusterServices,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<Vec<ServiceInfo>>> {
    Ok(ApiResponse::ok(cluster.services().list(&query.namespace).await?))
}

/// `GET /api/v1/services/{name}`
pub async fn get(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<ServiceInfo>> {
    let svc = cluster.services().get(query.object_namespace(), &name).await?;
    Ok(ApiResponse::ok(svc))
}

/// `DELETE /api/v1/services/{name}`
pub async fn delete(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<()>> {
    cluster.services().delete(query.object_namespace(), &name).await?;
    Ok(ApiResponse::done())
}
