//! Shared router state

use std::sync::Arc;

use axum::extract::FromRef;
use kubemux_core::ClusterAppService;
use kubemux_kube::FactoryConfig;

use crate::pool::ConnectionManager;

#[derive(Clone)]
pub struct AppState {
    pub manager: ConnectionManager,
    pub clusters: Arc<ClusterAppService>,
    /// Settings for throwaway probe clients
    pub probe_config: FactoryConfig,
}

impl FromRef<AppState> for ConnectionManager {
    fn from_ref(state: &AppState) -> Self {
        state.manager.clone()
    }
}

impl FromRef<AppState> for Arc<ClusterAppService> {
    fn from_ref(state: &AppState) -> Self {
        state.clusters.clone()
    }
}
