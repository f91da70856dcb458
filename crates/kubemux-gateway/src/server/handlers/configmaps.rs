//! ConfigMap endpoints

use axum::extract::Path;
use serde::Deserialize;

use super::{object_namespace, ApiResult, NamespaceQuery};
use crate::server::response::{ApiError, ApiJson, ApiQuery, ApiResponse};
use crate::services::{ClusterServices, ConfigMapInfo, StringMap};

#[derive(Debug, Deserialize)]
pub struct CreateConfigMapRequest {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: StringMap,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigMapRequest {
    #[serde(default)]
    pub data: StringMap,
}

/// `GET /api/v1/configmaps`
pub async fn list(
    cluster: ClusterServices,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<Vec<ConfigMapInfo>>> {
    Ok(ApiResponse::ok(cluster.configmaps().list(&query.namespace).await?))
}

/// `GET /api/v1/configmaps/{name}`
pub async fn get(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<ConfigMapInfo>> {
    let cm = cluster.configmaps().get(query.object_namespace(), &name).await?;
    Ok(ApiResponse::ok(cm))
}

/// `POST /api/v1/configmaps`
pub async fn create(
    cluster: ClusterServices,
    ApiJson(req): ApiJson<CreateConfigMapRequest>,
) -> ApiResult<ApiResponse<()>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("ConfigMap name is required"));
    }
    let namespace = object_namespace(&req.namespace);
    cluster
        .configmaps()
        .create(namespace, req.name.trim(), req.data)
        .await?;
    Ok(ApiResponse::done())
}

/// `PUT /api/v1/configmaps/{name}`
pub async fn update(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
    ApiJson(req): ApiJson<UpdateConfigMapRequest>,
) -> ApiResult<ApiResponse<()>> {
    cluster
        .configmaps()
        .update(query.object_namespace(), &name, req.data)
        .await?;
    Ok(ApiResponse::done())
}

/// `DELETE /api/v1/configmaps/{name}`
pub async fn delete(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<()>> {
    cluster
        .configmaps()
        .delete(query.object_namespace(), &name)
        .await?;
    Ok(ApiResponse::done())
}
