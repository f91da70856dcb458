//! Credential Resolver
//!
//! Stored credential fields to a [`ConnectionDescriptor`]. Kubeconfig
//! documents are loaded by `kube`, so every auth mechanism a kubeconfig can
//! name (tokens, client certificates, exec plugins, auth providers) is
//! honoured. Keeps no state.

use std::path::PathBuf;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use kubemux_core::{ClusterCredentials, ConnectionError, CredentialSource};
use tracing::{debug, warn};

use crate::descriptor::ConnectionDescriptor;

/// Resolve the highest-priority populated credential form.
pub async fn resolve(
    credentials: &ClusterCredentials,
) -> Result<ConnectionDescriptor, ConnectionError> {
    let source = credentials.select()?;
    debug!(source = source.label(), "[Resolver] Resolving credentials");
    resolve_source(source).await
}

pub(crate) async fn resolve_source(
    source: CredentialSource<'_>,
) -> Result<ConnectionDescriptor, ConnectionError> {
    match source {
        CredentialSource::Inline(text) => {
            let kubeconfig = Kubeconfig::from_yaml(text).map_err(content_error)?;
            load(kubeconfig).await.map_err(content_error)
        }
        CredentialSource::File(path) => load_file(PathBuf::from(path)).await,
        CredentialSource::Token { server_url, token } => {
            warn!(
                endpoint = %server_url,
                "[Resolver] Token credentials skip TLS verification"
            );
            let descriptor = ConnectionDescriptor::for_endpoint(server_url)
                .map_err(ConnectionError::ConnectionFailed)?;
            Ok(descriptor.with_bearer_token(token).insecure())
        }
    }
}

/// Load a kubeconfig file from disk and resolve its current context.
pub(crate) async fn load_file(path: PathBuf) -> Result<ConnectionDescriptor, ConnectionError> {
    let kubeconfig = tokio::task::spawn_blocking(move || Kubeconfig::read_from(&path))
        .await
        .map_err(|e| {
            ConnectionError::CacheInvariantViolation(format!("kubeconfig read task failed: {}", e))
        })?
        .map_err(file_error)?;
    load(kubeconfig).await.map_err(file_error)
}

async fn load(
    kubeconfig: Kubeconfig,
) -> Result<ConnectionDescriptor, kube::config::KubeconfigError> {
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
    Ok(ConnectionDescriptor::from_config(config))
}

fn content_error(e: impl std::fmt::Display) -> ConnectionError {
    ConnectionError::InvalidCredentials(format!("Failed to build config from content: {}", e))
}

fn file_error(e: impl std::fmt::Display) -> ConnectionError {
    ConnectionError::InvalidCredentials(format!("Failed to build config from file: {}", e))
}
