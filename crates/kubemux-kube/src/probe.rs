//! Connectivity probe
//!
//! Every failure is reported as data; callers always get a `ProbeResult`.

use kubemux_core::ClusterCredentials;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::descriptor::ConnectionDescriptor;
use crate::error::KubeError;
use crate::factory::FactoryConfig;
use crate::resolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ProbeResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            version: None,
        }
    }

    pub fn connected(version: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Connection successful".to_string(),
            version: Some(version.into()),
        }
    }
}

/// Build a throwaway client and ask the server for its version.
pub async fn probe(descriptor: &ConnectionDescriptor, config: &FactoryConfig) -> ProbeResult {
    let client = match config.client(descriptor) {
        Ok(client) => client,
        Err(e) => return ProbeResult::failed(format!("Failed to create kubernetes client: {}", e)),
    };

    match client.apiserver_version().await.map_err(KubeError::from) {
        Ok(version) => {
            info!(
                endpoint = %descriptor.endpoint(),
                version = %version.git_version,
                "[Probe] Cluster reachable"
            );
            ProbeResult::connected(version.git_version)
        }
        Err(e) => {
            debug!(endpoint = %descriptor.endpoint(), "[Probe] Cluster unreachable: {}", e);
            ProbeResult::failed(format!("Failed to connect to kubernetes cluster: {}", e))
        }
    }
}

/// Select, resolve and probe raw credentials.
pub async fn probe_credentials(
    credentials: &ClusterCredentials,
    config: &FactoryConfig,
) -> ProbeResult {
    match resolver::resolve(credentials).await {
        Ok(descriptor) => probe(&descriptor, config).await,
        Err(e) => ProbeResult::failed(e.to_string()),
    }
}
