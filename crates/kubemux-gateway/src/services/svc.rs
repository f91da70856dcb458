//! Service (svc) operations

use k8s_openapi::api::core::v1::{Service, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::{Api, DeleteParams, ListParams};
use kube::Client;
use kubemux_kube::KubeError;
use serde::Serialize;

use super::format::ResourceMeta;
use super::{scoped, StringMap};

#[derive(Debug, Clone, Serialize)]
pub struct PortInfo {
    pub name: String,
    pub protocol: String,
    pub port: i32,
    pub target_port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_port: Option<i32>,
}

impl From<ServicePort> for PortInfo {
    fn from(p: ServicePort) -> Self {
        let target_port = match p.target_port {
            Some(IntOrString::String(name)) => name,
            Some(IntOrString::Int(n)) => n.to_string(),
            None => String::new(),
        };
        Self {
            name: p.name.unwrap_or_default(),
            protocol: p.protocol.unwrap_or_default(),
            port: p.port,
            target_port,
            node_port: p.node_port.filter(|port| *port != 0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(rename = "type")]
    pub kind: String,
    pub cluster_ip: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_ip: Vec<String>,
    pub ports: Vec<PortInfo>,
    pub selector: StringMap,
}

impl From<Service> for ServiceInfo {
    fn from(svc: Service) -> Self {
        let spec = svc.spec.unwrap_or_default();
        Self {
            meta: ResourceMeta::from(svc.metadata),
            kind: spec.type_.unwrap_or_default(),
            cluster_ip: spec.cluster_ip.unwrap_or_default(),
            external_ip: spec.external_ips.unwrap_or_default(),
            ports: spec
                .ports
                .unwrap_or_default()
                .into_iter()
                .map(PortInfo::from)
                .collect(),
            selector: spec.selector.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct SvcService {
    client: Client,
}

impl SvcService {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn list(&self, namespace: &str) -> Result<Vec<ServiceInfo>, KubeError> {
        let list = scoped::<Service>(&self.client, namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(ServiceInfo::from).collect())
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Result<ServiceInfo, KubeError> {
        let svc = self.api(namespace).get(name).await?;
        Ok(ServiceInfo::from(svc))
    }

    pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), KubeError> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    fn api(&self, namespace: &str) -> Api<Service> {
        Api::namespaced(self.client.clone(), namespace)
    }
}
