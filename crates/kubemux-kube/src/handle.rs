//! Client Handle - the cached, shareable connection to one cluster

use std::sync::Arc;

use kube::Client;

use crate::descriptor::ConnectionDescriptor;
use crate::metrics::MetricsClient;

/// Live clients for one cluster plus the descriptor they were built from.
///
/// Immutable once built; shared as `Arc<ClientHandle>`.
#[derive(Clone)]
pub struct ClientHandle {
    client: Client,
    metrics: Option<MetricsClient>,
    descriptor: Arc<ConnectionDescriptor>,
}

impl ClientHandle {
    pub fn new(
        client: Client,
        metrics: Option<MetricsClient>,
        descriptor: ConnectionDescriptor,
    ) -> Self {
        Self {
            client,
            metrics,
            descriptor: Arc::new(descriptor),
        }
    }

    /// Primary resource client. Cheap to clone into an `Api<K>`.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Metrics API client, when one was built
    pub fn metrics(&self) -> Option<&MetricsClient> {
        self.metrics.as_ref()
    }

    /// Configuration the clients were built from
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    pub fn endpoint(&self) -> &str {
        self.descriptor.endpoint()
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("endpoint", &self.descriptor.endpoint())
            .field("auth", &self.descriptor.auth_kind())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
