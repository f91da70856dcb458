//! Node operations

use std::collections::{BTreeMap, HashMap};

use k8s_openapi::api::core::v1::{Node, NodeCondition};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::{Api, ListParams};
use kube::Client;
use kubemux_kube::{KubeError, MetricsClient, NodeMetrics};
use serde::Serialize;
use tracing::debug;

use super::format::ResourceMeta;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceCapacity {
    pub cpu: String,
    pub memory: String,
    pub pods: String,
}

impl ResourceCapacity {
    fn from_quantities(values: Option<&BTreeMap<String, Quantity>>) -> Self {
        let get = |key: &str| {
            values
                .and_then(|values| values.get(key))
                .map(|qty| qty.0.clone())
                .unwrap_or_default()
        };
        Self {
            cpu: get("cpu"),
            memory: get("memory"),
            pods: get("pods"),
        }
    }
}

/// Live usage reported by metrics-server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeUsage {
    pub cpu: String,
    pub memory: String,
}

impl From<&NodeMetrics> for NodeUsage {
    fn from(metrics: &NodeMetrics) -> Self {
        let get = |key: &str| metrics.usage.get(key).cloned().unwrap_or_default();
        Self {
            cpu: get("cpu"),
            memory: get("memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl From<NodeCondition> for ConditionInfo {
    fn from(c: NodeCondition) -> Self {
        Self {
            kind: c.type_,
            status: c.status,
            reason: c.reason.unwrap_or_default(),
            message: c.message.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub status: String,
    pub internal_ip: String,
    pub os_image: String,
    pub kubelet_version: String,
    pub container_runtime: String,
    pub capacity: ResourceCapacity,
    pub allocatable: ResourceCapacity,
    pub conditions: Vec<ConditionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<NodeUsage>,
}

/// `Ready`, `NotReady`, or `Unknown` when the node reports no Ready condition.
pub fn node_status(conditions: &[NodeCondition]) -> &'static str {
    match conditions.iter().find(|c| c.type_ == "Ready") {
        Some(c) if c.status == "True" => "Ready",
        Some(_) => "NotReady",
        None => "Unknown",
    }
}

impl From<Node> for NodeInfo {
    fn from(node: Node) -> Self {
        let status = node.status.unwrap_or_default();
        let conditions = status.conditions.unwrap_or_default();
        let node_info = status.node_info.unwrap_or_default();
        Self {
            status: node_status(&conditions).to_string(),
            internal_ip: status
                .addresses
                .unwrap_or_default()
                .into_iter()
                .find(|a| a.type_ == "InternalIP")
                .map(|a| a.address)
                .unwrap_or_default(),
            os_image: node_info.os_image,
            kubelet_version: node_info.kubelet_version,
            container_runtime: node_info.container_runtime_version,
            capacity: ResourceCapacity::from_quantities(status.capacity.as_ref()),
            allocatable: ResourceCapacity::from_quantities(status.allocatable.as_ref()),
            conditions: conditions.into_iter().map(ConditionInfo::from).collect(),
            meta: ResourceMeta::from(node.metadata),
            usage: None,
        }
    }
}

#[derive(Clone)]
pub struct NodeService {
    api: Api<Node>,
    metrics: Option<MetricsClient>,
}

impl NodeService {
    pub fn new(client: &Client, metrics: Option<&MetricsClient>) -> Self {
        Self {
            api: Api::all(client.clone()),
            metrics: metrics.cloned(),
        }
    }

    pub fn has_metrics(&self) -> bool {
        self.metrics.is_some()
    }

    /// All nodes, with usage attached when metrics-server answers.
    pub async fn list(&self) -> Result<Vec<NodeInfo>, KubeError> {
        let list = self.api.list(&ListParams::default()).await?;

        let mut usage: HashMap<String, NodeUsage> = HashMap::new();
        if let Some(metrics) = &self.metrics {
            match metrics.node_metrics().await {
                Ok(all) => {
                    usage = all
                        .iter()
                        .map(|m| (m.name.clone(), NodeUsage::from(m)))
                        .collect();
                }
                Err(e) => debug!("[NodeService] Node metrics unavailable: {}", e),
            }
        }

        Ok(list
            .items
            .into_iter()
            .map(|node| {
                let mut info = NodeInfo::from(node);
                info.usage = usage.remove(&info.meta.name);
                info
            })
            .collect())
    }

    pub async fn get(&self, name: &str) -> Result<NodeInfo, KubeError> {
        let node = self.api.get(name).await?;

        let mut info = NodeInfo::from(node);
        if let Some(metrics) = &self.metrics {
            match metrics.node_metrics_for(name).await {
                Ok(m) => info.usage = Some(NodeUsage::from(&m)),
                Err(e) => debug!(node = %name, "[NodeService] Node metrics unavailable: {}", e),
            }
        }
        Ok(info)
    }
}
