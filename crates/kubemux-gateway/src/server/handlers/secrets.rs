//! Secret endpoints

use axum::extract::Path;
use serde::Deserialize;

use super::{default_namespace, object_namespace, ApiResult, NamespaceQuery};
use crate::server::response::{ApiError, ApiJson, ApiQuery, ApiResponse};
use crate::services::{ClusterServices, SecretInfo, StringMap};

#[derive(Debug, Deserialize)]
pub struct SecretQuery {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Return base64-decoded values
    #[serde(default)]
    pub decode: bool,
}

/// Values are plain text; they are encoded before storage.
#[derive(Debug, Deserialize)]
pub struct CreateSecretRequest {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: StringMap,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSecretRequest {
    #[serde(default)]
    pub data: StringMap,
}

/// `GET /api/v1/secrets`
pub async fn list(
    cluster: ClusterServices,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<Vec<SecretInfo>>> {
    Ok(ApiResponse::ok(cluster.secrets().list(&query.namespace).await?))
}

/// `GET /api/v1/secrets/{name}`
pub async fn get(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<SecretQuery>,
) -> ApiResult<ApiResponse<SecretInfo>> {
    let namespace = object_namespace(&query.namespace);
    let secret = cluster.secrets().get(namespace, &name, query.decode).await?;
    Ok(ApiResponse::ok(secret))
}

/// `POST /api/v1/secrets`
pub async fn create(
    cluster: ClusterServices,
    ApiJson(req): ApiJson<CreateSecretRequest>,
) -> ApiResult<ApiResponse<()>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Secret name is required"));
    }
    let namespace = object_namespace(&req.namespace);
    cluster
        .secrets()
        .create(namespace, req.name.trim(), &req.kind, &req.data)
        .await?;
    Ok(ApiResponse::done())
}

/// `PUT /api/v1/secrets/{name}`
pub async fn update(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
    ApiJson(req): ApiJson<UpdateSecretRequest>,
) -> ApiResult<ApiResponse<()>> {
    cluster
        .secrets()
        .update(query.object_namespace(), &name, &req.data)
        .await?;
    Ok(ApiResponse::done())
}

/// `DELETE /api/v1/secrets/{name}`
pub async fn delete(
    cluster: ClusterServices,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<NamespaceQuery>,
) -> ApiResult<ApiResponse<()>> {
    cluster
        .secrets()
        .delete(query.object_namespace(), &name)
        .await?;
    Ok(ApiResponse::done())
}
