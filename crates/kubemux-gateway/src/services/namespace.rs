//! Namespace operations

use chrono::Utc;
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::Client;
use kubemux_kube::KubeError;
use serde::Serialize;

use super::format::format_age;

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceInfo {
    pub name: String,
    pub status: String,
    pub age: String,
}

impl From<Namespace> for NamespaceInfo {
    fn from(ns: Namespace) -> Self {
        Self {
            age: ns
                .metadata
                .creation_timestamp
                .map(|created| format_age(created.0, Utc::now()))
                .unwrap_or_default(),
            status: ns.status.and_then(|s| s.phase).unwrap_or_default(),
            name: ns.metadata.name.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct NamespaceService {
    api: Api<Namespace>,
}

impl NamespaceService {
    pub fn new(client: &Client) -> Self {
        Self {
            api: Api::all(client.clone()),
        }
    }

    pub async fn list(&self) -> Result<Vec<NamespaceInfo>, KubeError> {
        let list = self.api.list(&ListParams::default()).await?;
        Ok(list.items.into_iter().map(NamespaceInfo::from).collect())
    }

    pub async fn create(&self, name: &str) -> Result<(), KubeError> {
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        self.api.create(&PostParams::default(), &namespace).await?;
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<(), KubeError> {
        self.api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}
