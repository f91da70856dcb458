//! ConfigMap operations

use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::Client;
use kubemux_kube::KubeError;
use serde::Serialize;

use super::format::ResourceMeta;
use super::{scoped, StringMap};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigMapInfo {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub data: StringMap,
}

impl From<ConfigMap> for ConfigMapInfo {
    fn from(cm: ConfigMap) -> Self {
        Self {
            meta: ResourceMeta::from(cm.metadata),
            data: cm.data.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct ConfigMapService {
    client: Client,
}

impl ConfigMapService {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn list(&self, namespace: &str) -> Result<Vec<ConfigMapInfo>, KubeError> {
        let list = scoped::<ConfigMap>(&self.client, namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(ConfigMapInfo::from).collect())
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Result<ConfigMapInfo, KubeError> {
        let cm = self.api(namespace).get(name).await?;
        Ok(ConfigMapInfo::from(cm))
    }

    pub async fn create(
        &self,
        namespace: &str,
        name: &str,
        data: StringMap,
    ) -> Result<(), KubeError> {
        let cm = ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            data: Some(data),
            ..Default::default()
        };
        self.api(namespace).create(&PostParams::default(), &cm).await?;
        Ok(())
    }

    /// Replace the whole data map, keeping every other field of the object.
    pub async fn update(
        &self,
        namespace: &str,
        name: &str,
        data: StringMap,
    ) -> Result<(), KubeError> {
        let api = self.api(namespace);
        let mut cm = api.get(name).await?;
        cm.data = Some(data);
        api.replace(name, &PostParams::default(), &cm).await?;
        Ok(())
    }

    pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), KubeError> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    fn api(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}
