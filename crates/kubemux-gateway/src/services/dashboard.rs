//! Cluster-wide dashboard counters

use std::fmt::Debug;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Node, Pod, Secret, Service};
use kube::api::{Api, ListParams};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PodStatusStats {
    pub running: usize,
    pub pending: usize,
    pub failed: usize,
    pub succeeded: usize,
    pub unknown: usize,
}

impl PodStatusStats {
    pub fn record(&mut self, phase: &str) {
        match phase {
            "Running" => self.running += 1,
            "Pending" => self.pending += 1,
            "Failed" => self.failed += 1,
            "Succeeded" => self.succeeded += 1,
            _ => self.unknown += 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub node_count: usize,
    pub namespace_count: usize,
    pub pod_count: usize,
    pub deployment_count: usize,
    pub service_count: usize,
    pub configmap_count: usize,
    pub secret_count: usize,
    pub pod_status_stats: PodStatusStats,
}

#[derive(Clone)]
pub struct DashboardService {
    client: Client,
}

impl DashboardService {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Every count is best effort: a list that fails leaves its count at 0.
    pub async fn stats(&self) -> DashboardStats {
        let (nodes, namespaces, pods, deployments, services, configmaps, secrets) = tokio::join!(
            count::<Node>(&self.client),
            count::<Namespace>(&self.client),
            items::<Pod>(&self.client),
            count::<Deployment>(&self.client),
            count::<Service>(&self.client),
            count::<ConfigMap>(&self.client),
            count::<Secret>(&self.client),
        );

        let mut stats = DashboardStats {
            node_count: nodes,
            namespace_count: namespaces,
            deployment_count: deployments,
            service_count: services,
            configmap_count: configmaps,
            secret_count: secrets,
            ..Default::default()
        };
        if let Some(pods) = pods {
            stats.pod_count = pods.len();
            for pod in &pods {
                let phase = pod
                    .status
                    .as_ref()
                    .and_then(|status| status.phase.as_deref())
                    .unwrap_or_default();
                stats.pod_status_stats.record(phase);
            }
        }
        stats
    }
}

async fn items<K>(client: &Client) -> Option<Vec<K>>
where
    K: Resource + Clone + Debug + DeserializeOwned,
    <K as Resource>::DynamicType: Default,
{
    match Api::<K>::all(client.clone()).list(&ListParams::default()).await {
        Ok(list) => Some(list.items),
        Err(e) => {
            debug!(
                kind = %K::kind(&Default::default()),
                "[DashboardService] List failed, counting as 0: {}", e
            );
            None
        }
    }
}

async fn count<K>(client: &Client) -> usize
where
    K: Resource + Clone + Debug + DeserializeOwned,
    <K as Resource>::DynamicType: Default,
{
    items::<K>(client).await.map_or(0, |v| v.len())
}
