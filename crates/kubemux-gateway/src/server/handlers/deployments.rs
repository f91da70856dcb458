//! Deployment endpoints

use axum::extract::Path;
use serde::Deserialize;

use super::{default_namespace, object_namespace, ApiResult, NamespaceQuery};
use crate::server::response::{ApiError, ApiQuery, ApiResponse};
use crate::services::{ClusterServices, DeploymentInfo};

/// `?replicas=` is kept as text so a bad value gets the envelope, not a
/// bare extractor rejection.
#[derive(Debug, Deserialize)]
pub struct ScaleQuery {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub replicas: Option<String>,
}

fn parse_replicas(raw: Option<&str>) -> Result<i32, ApiError> {
    raw.and_then(|r| r.trim().parse::<i32>().ok())
        .filter(|r| *r >= 0)
        .ok_or_else(|| ApiError::bad_request("Invalid replicas"))
}

/// `GET /api/v1/deployments`
pub async fn list(
    cluster: ClusterServices,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<Vec<DeploymentInfo>>> {
    Ok(ApiResponse::ok(cluster.deployments().list(&query.namespace).await?))
}

/// `GET /api/v1/deployments/{name}`
pub async fn get(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<DeploymentInfo>> {
    let deployment = cluster
        .deployments()
        .get(query.object_namespace(), &name)
        .await?;
    Ok(ApiResponse::ok(deployment))
}

/// `DELETE /api/v1/deployments/{name}`
pub async fn delete(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<()>> {
    cluster
        .deployments()
        .delete(query.object_namespace(), &name)
        .await?;
    Ok(ApiResponse::done())
}

/// `PUT /api/v1/deployments/{name}/scale?replicas=N`
pub async fn scale(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<ScaleQuery>,
) -> ApiResult<ApiResponse<()>> {
    let replicas = parse_replicas(query.replicas.as_deref())?;
    let namespace = object_namespace(&query.namespace);
    cluster.deployments().scale(namespace, &name, replicas).await?;
    Ok(ApiResponse::done())
}

/// `PUT /api/v1/deployments/{name}/restart`
pub async fn restart(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<()>> {
    cluster
        .deployments()
        .restart(query.object_namespace(), &name)
        .await?;
    Ok(ApiResponse::done())
}
