//! Deployment operations

use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams};
use kube::Client;
use kubemux_kube::KubeError;
use serde::Serialize;
use serde_json::{json, Value};

use super::format::ResourceMeta;
use super::scoped;

/// Template annotation whose change makes the controller roll every pod.
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentInfo {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub replicas: i32,
    pub ready_replicas: i32,
    pub updated_replicas: i32,
    pub available_replicas: i32,
    pub strategy: String,
}

impl From<Deployment> for DeploymentInfo {
    fn from(d: Deployment) -> Self {
        let spec = d.spec.unwrap_or_default();
        let status = d.status.unwrap_or_default();
        Self {
            meta: ResourceMeta::from(d.metadata),
            replicas: spec.replicas.unwrap_or(0),
            ready_replicas: status.ready_replicas.unwrap_or(0),
            updated_replicas: status.updated_replicas.unwrap_or(0),
            available_replicas: status.available_replicas.unwrap_or(0),
            strategy: spec
                .strategy
                .and_then(|strategy| strategy.type_)
                .unwrap_or_default(),
        }
    }
}

pub fn scale_patch(replicas: i32) -> Value {
    json!({ "spec": { "replicas": replicas } })
}

pub fn restart_patch(at: DateTime<Utc>) -> Value {
    json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": {
                        RESTARTED_AT_ANNOTATION: at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
                    }
                }
            }
        }
    })
}

#[derive(Clone)]
pub struct DeploymentService {
    client: Client,
}

impl DeploymentService {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn list(&self, namespace: &str) -> Result<Vec<DeploymentInfo>, KubeError> {
        let list = scoped::<Deployment>(&self.client, namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(DeploymentInfo::from).collect())
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Result<DeploymentInfo, KubeError> {
        let deployment = self.api(namespace).get(name).await?;
        Ok(DeploymentInfo::from(deployment))
    }

    pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), KubeError> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    pub async fn scale(&self, namespace: &str, name: &str, replicas: i32) -> Result<(), KubeError> {
        self.merge_patch(namespace, name, scale_patch(replicas)).await
    }

    /// Rolling restart, the same way `kubectl rollout restart` does it.
    pub async fn restart(&self, namespace: &str, name: &str) -> Result<(), KubeError> {
        self.merge_patch(namespace, name, restart_patch(Utc::now()))
            .await
    }

    async fn merge_patch(&self, namespace: &str, name: &str, patch: Value) -> Result<(), KubeError> {
        self.api(namespace)
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    fn api(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}
