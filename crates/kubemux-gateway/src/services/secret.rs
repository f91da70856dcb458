//! Secret operations
//!
//! Values travel base64 encoded, as the API stores them, unless the caller
//! asks for them decoded. Writes take plain values.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::Client;
use kubemux_kube::KubeError;
use serde::Serialize;

use super::format::ResourceMeta;
use super::{scoped, StringMap};

pub const DEFAULT_SECRET_TYPE: &str = "Opaque";

#[derive(Debug, Clone, Serialize)]
pub struct SecretInfo {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: StringMap,
}

impl SecretInfo {
    fn from_secret(secret: Secret, decode: bool) -> Self {
        Self {
            meta: ResourceMeta::from(secret.metadata),
            kind: secret.type_.unwrap_or_default(),
            data: render_values(&secret.data.unwrap_or_default(), decode),
        }
    }
}

impl From<Secret> for SecretInfo {
    fn from(secret: Secret) -> Self {
        Self::from_secret(secret, false)
    }
}

/// Plain values as the bytes the API stores.
pub fn encode_values(data: &StringMap) -> BTreeMap<String, ByteString> {
    data.iter()
        .map(|(k, v)| (k.clone(), ByteString(v.as_bytes().to_vec())))
        .collect()
}

/// Base64 text for every value, or the UTF-8 text when `decode` is set.
/// Values that are not UTF-8 stay base64 either way.
pub fn render_values(data: &BTreeMap<String, ByteString>, decode: bool) -> StringMap {
    data.iter()
        .map(|(k, v)| {
            let rendered = decode
                .then(|| String::from_utf8(v.0.clone()).ok())
                .flatten()
                .unwrap_or_else(|| STANDARD.encode(&v.0));
            (k.clone(), rendered)
        })
        .collect()
}

#[derive(Clone)]
pub struct SecretService {
    client: Client,
}

impl SecretService {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn list(&self, namespace: &str) -> Result<Vec<SecretInfo>, KubeError> {
        let list = scoped::<Secret>(&self.client, namespace)
            .list(&ListParams::default())
            .await?;
        Ok(list.items.into_iter().map(SecretInfo::from).collect())
    }

    pub async fn get(
        &self,
        namespace: &str,
        name: &str,
        decode: bool,
    ) -> Result<SecretInfo, KubeError> {
        let secret = self.api(namespace).get(name).await?;
        Ok(SecretInfo::from_secret(secret, decode))
    }

    pub async fn create(
        &self,
        namespace: &str,
        name: &str,
        kind: &str,
        data: &StringMap,
    ) -> Result<(), KubeError> {
        let kind = if kind.is_empty() { DEFAULT_SECRET_TYPE } else { kind };
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            type_: Some(kind.to_string()),
            data: Some(encode_values(data)),
            ..Default::default()
        };
        self.api(namespace)
            .create(&PostParams::default(), &secret)
            .await?;
        Ok(())
    }

    /// Replace the whole data map with `data` (plain values).
    pub async fn update(
        &self,
        namespace: &str,
        name: &str,
        data: &StringMap,
    ) -> Result<(), KubeError> {
        let api = self.api(namespace);
        let mut secret = api.get(name).await?;
        secret.data = Some(encode_values(data));
        secret.string_data = None;
        api.replace(name, &PostParams::default(), &secret).await?;
        Ok(())
    }

    pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), KubeError> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    fn api(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}
