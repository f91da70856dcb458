//! Per-resource operations bound to one cluster connection
//!
//! The cluster binder builds a [`ClusterServices`] for each request and
//! stores it in the request extensions. Handlers pull it out with the
//! extractor in `server::binder` and never see the connection manager.

mod configmap;
mod dashboard;
mod deployment;
pub mod format;
mod manifest;
mod namespace;
mod node;
mod pod;
mod secret;
mod svc;

use std::collections::BTreeMap;
use std::sync::Arc;

use kube::core::NamespaceResourceScope;
use kube::{Api, Client, Resource};
use kubemux_core::TargetId;
use kubemux_kube::ClientHandle;

pub use configmap::{ConfigMapInfo, ConfigMapService};
pub use dashboard::{DashboardService, DashboardStats, PodStatusStats};
pub use deployment::{DeploymentInfo, DeploymentService, RESTARTED_AT_ANNOTATION};
pub use manifest::{CreatedObject, ManifestError, ManifestService};
pub use namespace::{NamespaceInfo, NamespaceService};
pub use node::{ConditionInfo, NodeInfo, NodeService, NodeUsage, ResourceCapacity};
pub use pod::{ContainerInfo, PodInfo, PodService, DEFAULT_TAIL_LINES};
pub use secret::{SecretInfo, SecretService, DEFAULT_SECRET_TYPE};
pub use svc::{PortInfo, ServiceInfo, SvcService};

/// Plain string map used for labels, config data and secret values.
pub type StringMap = BTreeMap<String, String>;

/// Namespace that manifests without `metadata.namespace` land in.
pub const DEFAULT_NAMESPACE: &str = "default";

/// `Api` for a namespaced kind; an empty namespace spans all of them.
pub(crate) fn scoped<K>(client: &Client, namespace: &str) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    <K as Resource>::DynamicType: Default,
{
    if namespace.is_empty() {
        Api::all(client.clone())
    } else {
        Api::namespaced(client.clone(), namespace)
    }
}

/// Every resource service for one request, sharing one client handle.
///
/// Built once per request by the binder; accessors only borrow.
#[derive(Clone)]
pub struct ClusterServices {
    target: TargetId,
    handle: Arc<ClientHandle>,
    namespaces: NamespaceService,
    nodes: NodeService,
    pods: PodService,
    deployments: DeploymentService,
    services: SvcService,
    configmaps: ConfigMapService,
    secrets: SecretService,
    dashboard: DashboardService,
    manifests: ManifestService,
}

impl ClusterServices {
    pub fn new(target: TargetId, handle: Arc<ClientHandle>) -> Self {
        let client = handle.client();
        Self {
            target,
            namespaces: NamespaceService::new(client),
            nodes: NodeService::new(client, handle.metrics()),
            pods: PodService::new(client),
            deployments: DeploymentService::new(client),
            services: SvcService::new(client),
            configmaps: ConfigMapService::new(client),
            secrets: SecretService::new(client),
            dashboard: DashboardService::new(client),
            manifests: ManifestService::new(client),
            handle,
        }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn handle(&self) -> &Arc<ClientHandle> {
        &self.handle
    }

    pub fn namespaces(&self) -> &NamespaceService {
        &self.namespaces
    }

    pub fn nodes(&self) -> &NodeService {
        &self.nodes
    }

    pub fn pods(&self) -> &PodService {
        &self.pods
    }

    pub fn deployments(&self) -> &DeploymentService {
        &self.deployments
    }

    pub fn services(&self) -> &SvcService {
        &self.services
    }

    pub fn configmaps(&self) -> &ConfigMapService {
        &self.configmaps
    }

    pub fn secrets(&self) -> &SecretService {
        &self.secrets
    }

    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }

    pub fn manifests(&self) -> &ManifestService {
        &self.manifests
    }
}

impl std::fmt::Debug for ClusterServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterServices")
            .field("target", &self.target)
            .field("endpoint", &self.handle.endpoint())
            .finish()
    }
}
