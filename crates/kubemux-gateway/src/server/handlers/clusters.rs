//! Cluster record endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use kubemux_core::{
    ClusterAppService, ClusterCredentials, ClusterId, ClusterInput, ClusterResponse,
};
use kubemux_kube::{probe_credentials, ProbeResult};
use tracing::info;

use super::ApiResult;
use crate::server::response::{ApiError, ApiJson, ApiResponse, Created};
use crate::server::state::AppState;

fn parse_id(raw: &str) -> Result<ClusterId, ApiError> {
    raw.parse::<ClusterId>().map_err(ApiError::from)
}

/// `GET /api/v1/clusters`
pub async fn list(
    State(clusters): State<Arc<ClusterAppService>>,
) -> ApiResult<ApiResponse<Vec<ClusterResponse>>> {
    Ok(ApiResponse::ok(clusters.list().await?))
}

/// `GET /api/v1/clusters/{id}`
pub async fn get(
    State(clusters): State<Arc<ClusterAppService>>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<ClusterResponse>> {
    let cluster = clusters.get(parse_id(&id)?).await?;
    Ok(ApiResponse::ok(cluster.into()))
}

/// `POST /api/v1/clusters`
pub async fn create(
    State(clusters): State<Arc<ClusterAppService>>,
    ApiJson(input): ApiJson<ClusterInput>,
) -> ApiResult<Created<ClusterResponse>> {
    let cluster = clusters.create(&input).await?;
    Ok(Created(cluster.into()))
}

/// `PUT /api/v1/clusters/{id}`
pub async fn update(
    State(clusters): State<Arc<ClusterAppService>>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ClusterInput>,
) -> ApiResult<ApiResponse<ClusterResponse>> {
    let cluster = clusters.update(parse_id(&id)?, &input).await?;
    Ok(ApiResponse::ok(cluster.into()))
}

/// `DELETE /api/v1/clusters/{id}`
pub async fn delete(
    State(clusters): State<Arc<ClusterAppService>>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    clusters.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::done())
}

/// `POST /api/v1/clusters/test-connection`
///
/// Always 200: reachability is reported in the payload.
pub async fn test_connection(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<ClusterCredentials>,
) -> ApiResponse<ProbeResult> {
    let result = probe_credentials(&credentials, &state.probe_config).await;
    info!(success = result.success, "[Gateway] Connection test finished");
    ApiResponse::ok(result)
}
