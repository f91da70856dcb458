//! The default connection
//!
//! Requests without a `cluster_id` go to the cluster this process was
//! started against: the kubeconfig at the configured path when that file
//! exists, otherwise the in-cluster service account.

use std::path::Path;

use kube::Config;
use kubemux_core::ConnectionError;
use tracing::info;

use crate::descriptor::ConnectionDescriptor;
use crate::factory::ConnectionFactory;
use crate::handle::ClientHandle;
use crate::resolver;

/// Resolve the default descriptor: kubeconfig file if present, else in-cluster.
pub async fn default_descriptor(
    kubeconfig: Option<&Path>,
) -> Result<ConnectionDescriptor, ConnectionError> {
    match kubeconfig.filter(|path| path.exists()) {
        Some(path) => {
            info!("[Defaults] Using kubeconfig {:?}", path);
            resolver::load_file(path.to_path_buf()).await
        }
        None => {
            info!("[Defaults] No kubeconfig found, using in-cluster configuration");
            Config::incluster()
                .map(ConnectionDescriptor::from_config)
                .map_err(|e| {
                    ConnectionError::InvalidCredentials(format!(
                        "unable to load in-cluster configuration: {}",
                        e
                    ))
                })
        }
    }
}

/// Build the default handle. Callers treat failure as fatal.
pub async fn build_default_handle(
    factory: &dyn ConnectionFactory,
    kubeconfig: Option<&Path>,
) -> Result<ClientHandle, ConnectionError> {
    let descriptor = default_descriptor(kubeconfig).await?;
    factory.build(descriptor)
}
