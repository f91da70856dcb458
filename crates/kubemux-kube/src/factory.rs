//! Connection Factory
//!
//! Builds a [`ClientHandle`] from a descriptor. Construction is all or
//! nothing: if either the resource client or the metrics client cannot be
//! built the whole build fails. Failures are never retried here.

use std::time::Duration;

use kube::{Client, Config};
use kubemux_core::{ClusterCredentials, ConnectionError};
use tracing::{debug, warn};

use crate::descriptor::ConnectionDescriptor;
use crate::error::error_chain;
use crate::handle::ClientHandle;
use crate::metrics::MetricsClient;
use crate::probe::{self, ProbeResult};

/// Builds client handles. Called from the blocking pool, inside a runtime
/// context; must not wait on the network.
pub trait ConnectionFactory: Send + Sync {
    fn build(&self, descriptor: ConnectionDescriptor) -> Result<ClientHandle, ConnectionError>;
}

/// Transport settings applied to every client the factory builds.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl FactoryConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overlay these timeouts on a resolved client configuration.
    pub(crate) fn apply(&self, mut config: Config) -> Config {
        config.connect_timeout = Some(self.connect_timeout);
        config.read_timeout = Some(self.request_timeout);
        config.write_timeout = Some(self.request_timeout);
        config
    }

    /// Build one `kube::Client` for a descriptor.
    pub(crate) fn client(&self, descriptor: &ConnectionDescriptor) -> Result<Client, String> {
        match descriptor.config().cluster_url.scheme_str() {
            Some("http") | Some("https") => {}
            other => {
                return Err(format!(
                    "unsupported scheme {:?} in {}",
                    other.unwrap_or_default(),
                    descriptor.endpoint()
                ))
            }
        }
        Client::try_from(self.apply(descriptor.config().clone())).map_err(|e| error_chain(&e))
    }
}

/// Production factory backed by `kube` clients.
#[derive(Debug, Clone, Default)]
pub struct KubeClientFactory {
    config: FactoryConfig,
}

impl KubeClientFactory {
    pub fn new(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Probe connectivity for raw credentials without touching any cache.
    pub async fn probe_credentials(&self, credentials: &ClusterCredentials) -> ProbeResult {
        probe::probe_credentials(credentials, &self.config).await
    }
}

impl ConnectionFactory for KubeClientFactory {
    fn build(&self, descriptor: ConnectionDescriptor) -> Result<ClientHandle, ConnectionError> {
        let client = self.config.client(&descriptor).map_err(|e| {
            warn!(endpoint = %descriptor.endpoint(), "[Factory] Client build failed: {}", e);
            ConnectionError::ConnectionFailed(e)
        })?;
        let metrics = self.config.client(&descriptor).map_err(|e| {
            warn!(endpoint = %descriptor.endpoint(), "[Factory] Metrics client build failed: {}", e);
            ConnectionError::ConnectionFailed(format!("metrics client: {}", e))
        })?;

        debug!(
            endpoint = %descriptor.endpoint(),
            auth = descriptor.auth_kind(),
            insecure = descriptor.insecure_skip_verify(),
            "[Factory] Built client handle"
        );
        Ok(ClientHandle::new(
            client,
            Some(MetricsClient::new(metrics)),
            descriptor,
        ))
    }
}
