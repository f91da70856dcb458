//! metrics.k8s.io client
//!
//! The metrics API is an aggregated API with no typed bindings, so node
//! usage is read as dynamic objects.

use std::collections::BTreeMap;

use kube::api::{Api, ApiResource, DynamicObject, ListParams};
use kube::core::GroupVersionKind;
use kube::{Client, ResourceExt};

use crate::error::KubeError;

/// Point-in-time usage for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMetrics {
    pub name: String,
    pub usage: BTreeMap<String, String>,
}

impl NodeMetrics {
    fn from_object(object: &DynamicObject) -> Self {
        let usage = object
            .data
            .get("usage")
            .and_then(|usage| usage.as_object())
            .map(|usage| {
                usage
                    .iter()
                    .filter_map(|(resource, qty)| {
                        qty.as_str().map(|qty| (resource.clone(), qty.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: object.name_any(),
            usage,
        }
    }
}

#[derive(Clone)]
pub struct MetricsClient {
    nodes: Api<DynamicObject>,
}

impl MetricsClient {
    pub fn new(client: Client) -> Self {
        let gvk = GroupVersionKind::gvk("metrics.k8s.io", "v1beta1", "NodeMetrics");
        let resource = ApiResource::from_gvk_with_plural(&gvk, "nodes");
        Self {
            nodes: Api::all_with(client, &resource),
        }
    }

    pub async fn node_metrics(&self) -> Result<Vec<NodeMetrics>, KubeError> {
        let list = self.nodes.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(NodeMetrics::from_object).collect())
    }

    pub async fn node_metrics_for(&self, name: &str) -> Result<NodeMetrics, KubeError> {
        let object = self.nodes.get(name).await?;
        Ok(NodeMetrics::from_object(&object))
    }
}

impl std::fmt::Debug for MetricsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsClient").finish_non_exhaustive()
    }
}
