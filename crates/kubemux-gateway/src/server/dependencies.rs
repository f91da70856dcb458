//! Dependency Injection Container
//!
//! Everything the gateway needs from outside is passed in here, so tests
//! can swap the record store or the connection factory.

use std::sync::Arc;

use kubemux_core::ClusterRepository;
use kubemux_kube::{ClientHandle, ConnectionFactory, FactoryConfig, KubeClientFactory};

/// Dependency container for the gateway
#[derive(Clone)]
pub struct GatewayDependencies {
    /// Cluster record store
    pub cluster_repo: Arc<dyn ClusterRepository>,
    /// Builds handles on cache misses
    pub factory: Arc<dyn ConnectionFactory>,
    /// Connection used when a request names no cluster
    pub default_handle: Arc<ClientHandle>,
    /// HTTP settings for connection probes
    pub factory_config: FactoryConfig,
}

/// Builder for GatewayDependencies
#[derive(Default)]
pub struct DependenciesBuilder {
    cluster_repo: Option<Arc<dyn ClusterRepository>>,
    factory: Option<Arc<dyn ConnectionFactory>>,
    default_handle: Option<Arc<ClientHandle>>,
    factory_config: Option<FactoryConfig>,
}

impl DependenciesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster_repo(mut self, repo: Arc<dyn ClusterRepository>) -> Self {
        self.cluster_repo = Some(repo);
        self
    }

    pub fn with_factory(mut self, factory: Arc<dyn ConnectionFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_default_handle(mut self, handle: Arc<ClientHandle>) -> Self {
        self.default_handle = Some(handle);
        self
    }

    pub fn with_factory_config(mut self, config: FactoryConfig) -> Self {
        self.factory_config = Some(config);
        self
    }

    /// Missing factory falls back to a [`KubeClientFactory`] with the
    /// configured (or default) HTTP settings.
    pub fn build(self) -> Result<GatewayDependencies, String> {
        let factory_config = self.factory_config.unwrap_or_default();
        let factory = self
            .factory
            .unwrap_or_else(|| Arc::new(KubeClientFactory::new(factory_config.clone())));

        Ok(GatewayDependencies {
            cluster_repo: self.cluster_repo.ok_or("cluster_repo is required")?,
            default_handle: self.default_handle.ok_or("default_handle is required")?,
            factory,
            factory_config,
        })
    }
}
