//! Manifest endpoints
//!
//! `/pods/yaml`, `/deployments/yaml` and `/services/yaml` all accept any
//! manifest stream; the route only names what the caller usually sends.

use serde::Deserialize;

use super::ApiResult;
use crate::server::response::{ApiJson, ApiResponse};
use crate::services::{ClusterServices, CreatedObject};

#[derive(Debug, Deserialize)]
pub struct ManifestRequest {
    #[serde(default)]
    pub yaml: String,
}

/// `POST /api/v1/{pods,deployments,services}/yaml`
pub async fn create(
    cluster: ClusterServices,
    ApiJson(req): ApiJson<ManifestRequest>,
) -> ApiResult<ApiResponse<Vec<CreatedObject>>> {
    let created = cluster.manifests().create(&req.yaml).await?;
    Ok(ApiResponse::ok(created))
}
