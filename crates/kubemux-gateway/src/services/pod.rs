//! Pod operations

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Container, ContainerState, ContainerStatus, Pod, PodCondition};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::{Api, DeleteParams, ListParams, LogParams};
use kube::Client;
use kubemux_kube::KubeError;
use serde::Serialize;

use super::format::ResourceMeta;
use super::node::ConditionInfo;
use super::scoped;

pub const DEFAULT_TAIL_LINES: i64 = 100;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContainerResources {
    pub cpu_request: String,
    pub memory_request: String,
    pub cpu_limit: String,
    pub memory_limit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerInfo {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restart_count: i32,
    pub state: String,
    pub resources: ContainerResources,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodInfo {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub status: String,
    pub pod_ip: String,
    pub node_name: String,
    pub containers: Vec<ContainerInfo>,
    pub conditions: Vec<ConditionInfo>,
}

impl From<PodCondition> for ConditionInfo {
    fn from(c: PodCondition) -> Self {
        Self {
            kind: c.type_,
            status: c.status,
            reason: c.reason.unwrap_or_default(),
            message: c.message.unwrap_or_default(),
        }
    }
}

fn state_label(state: &ContainerState) -> String {
    if state.running.is_some() {
        "Running".to_string()
    } else if let Some(waiting) = &state.waiting {
        format!("Waiting: {}", waiting.reason.as_deref().unwrap_or_default())
    } else if let Some(terminated) = &state.terminated {
        format!(
            "Terminated: {}",
            terminated.reason.as_deref().unwrap_or_default()
        )
    } else {
        String::new()
    }
}

fn container_info(container: Container, statuses: &[ContainerStatus]) -> ContainerInfo {
    let status = statuses.iter().find(|s| s.name == container.name);
    let resources = container.resources.unwrap_or_default();
    let quantity = |map: &Option<BTreeMap<String, Quantity>>, key: &str| {
        map.as_ref()
            .and_then(|map| map.get(key))
            .map(|qty| qty.0.clone())
            .unwrap_or_default()
    };

    ContainerInfo {
        ready: status.map(|s| s.ready).unwrap_or(false),
        restart_count: status.map(|s| s.restart_count).unwrap_or(0),
        state: status
            .and_then(|s| s.state.as_ref())
            .map(state_label)
            .unwrap_or_default(),
        resources: ContainerResources {
            cpu_request: quantity(&resources.requests, "cpu"),
            memory_request: quantity(&resources.requests, "memory"),
            cpu_limit: quantity(&resources.limits, "cpu"),
            memory_limit: quantity(&resources.limits, "memory"),
        },
        name: container.name,
        image: container.image.unwrap_or_default(),
    }
}

impl From<Pod> for PodInfo {
    fn from(pod: Pod) -> Self {
        let spec = pod.spec.unwrap_or_default();
        let status = pod.status.unwrap_or_default();
        let statuses = status.container_statuses.unwrap_or_default();
        Self {
            meta: ResourceMeta::from(pod.metadata),
            status: status.phase.unwrap_or_default(),
            pod_ip: status.pod_ip.unwrap_or_default(),
            node_name: spec.node_name.unwrap_or_default(),
            containers: spec
                .containers
                .into_iter()
                .map(|c| container_info(c, &statuses))
                .collect(),
            conditions: status
                .conditions
                .unwrap_or_default()
                .into_iter()
                .map(ConditionInfo::from)
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct PodService {
    client: Client,
}

impl PodService {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Pods in `namespace`; an empty namespace lists across all of them.
    pub async fn list(&self, namespace: &str) -> Result<Vec<PodInfo>, KubeError> {
        let list = scoped::<Pod>(&self.client, namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(PodInfo::from).collect())
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Result<PodInfo, KubeError> {
        let pod = self.api(namespace).get(name).await?;
        Ok(PodInfo::from(pod))
    }

    pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), KubeError> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    /// Last `tail_lines` log lines of `container` (or the only container).
    pub async fn logs(
        &self,
        namespace: &str,
        name: &str,
        container: Option<&str>,
        tail_lines: i64,
    ) -> Result<String, KubeError> {
        let params = LogParams {
            container: container.filter(|c| !c.is_empty()).map(str::to_string),
            tail_lines: Some(tail_lines),
            ..LogParams::default()
        };
        Ok(self.api(namespace).logs(name, &params).await?)
    }

    fn api(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}
