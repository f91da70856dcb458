//! Dashboard endpoint

use crate::server::response::ApiResponse;
use crate::services::{ClusterServices, DashboardStats};

/// `GET /api/v1/dashboard/stats`
pub async fn stats(cluster: ClusterServices) -> ApiResponse<DashboardStats> {
    ApiResponse::ok(cluster.dashboard().stats().await)
}
