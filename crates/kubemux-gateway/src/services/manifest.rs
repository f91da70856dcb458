//! Create objects from a YAML or JSON manifest stream
//!
//! Each document is mapped to its API resource through discovery, so any
//! kind the cluster serves can be created, namespaced or cluster scoped.
//! The whole stream is parsed before anything is created.

use kube::api::{Api, DynamicObject, PostParams};
use kube::core::GroupVersionKind;
use kube::discovery::{self, Scope};
use kube::{Client, ResourceExt};
use kubemux_kube::KubeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use super::DEFAULT_NAMESPACE;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("YAML content is required")]
    Empty,

    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    /// The cluster does not serve the document's kind
    #[error("Failed to resolve resource mapping for {kind}: {reason}")]
    UnknownKind { kind: String, reason: String },

    #[error(transparent)]
    Kube(#[from] KubeError),
}

/// One object the API server accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedObject {
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Split a manifest stream into objects, skipping empty documents.
pub fn parse_documents(text: &str) -> Result<Vec<DynamicObject>, ManifestError> {
    if text.trim().is_empty() {
        return Err(ManifestError::Empty);
    }

    let mut objects = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value =
            Value::deserialize(document).map_err(|e| ManifestError::Parse(e.to_string()))?;
        if value.is_null() || value.as_object().is_some_and(|fields| fields.is_empty()) {
            continue;
        }
        let object: DynamicObject =
            serde_json::from_value(value).map_err(|e| ManifestError::Parse(e.to_string()))?;
        objects.push(object);
    }

    if objects.is_empty() {
        return Err(ManifestError::Empty);
    }
    Ok(objects)
}

/// Group, version and kind named by an object's `apiVersion` and `kind`.
pub fn object_gvk(object: &DynamicObject) -> Result<GroupVersionKind, ManifestError> {
    let types = object
        .types
        .as_ref()
        .filter(|types| !types.api_version.is_empty() && !types.kind.is_empty())
        .ok_or_else(|| {
            ManifestError::Parse(format!(
                "object {:?} is missing apiVersion or kind",
                object.name_any()
            ))
        })?;

    let (group, version) = match types.api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", types.api_version.as_str()),
    };
    Ok(GroupVersionKind::gvk(group, version, &types.kind))
}

#[derive(Clone)]
pub struct ManifestService {
    client: Client,
}

impl ManifestService {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Create every object in `text`, in order. Stops at the first failure;
    /// objects created before it stay created.
    pub async fn create(&self, text: &str) -> Result<Vec<CreatedObject>, ManifestError> {
        let objects = parse_documents(text)?;

        let mut created = Vec::with_capacity(objects.len());
        for object in objects {
            created.push(self.create_one(object).await?);
        }
        Ok(created)
    }

    async fn create_one(&self, mut object: DynamicObject) -> Result<CreatedObject, ManifestError> {
        let gvk = object_gvk(&object)?;
        let (resource, caps) = discovery::pinned_kind(&self.client, &gvk)
            .await
            .map_err(|e| match e {
                kube::Error::Discovery(_) => ManifestError::UnknownKind {
                    kind: gvk.kind.clone(),
                    reason: e.to_string(),
                },
                kube::Error::Api(ref response) if response.code == 404 => {
                    ManifestError::UnknownKind {
                        kind: gvk.kind.clone(),
                        reason: e.to_string(),
                    }
                }
                other => ManifestError::Kube(KubeError::from(other)),
            })?;

        let api: Api<DynamicObject> = match caps.scope {
            Scope::Namespaced => {
                let namespace = object
                    .metadata
                    .namespace
                    .clone()
                    .filter(|ns| !ns.is_empty())
                    .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
                object.metadata.namespace = Some(namespace.clone());
                Api::namespaced_with(self.client.clone(), &namespace, &resource)
            }
            Scope::Cluster => Api::all_with(self.client.clone(), &resource),
        };

        let result = api
            .create(&PostParams::default(), &object)
            .await
            .map_err(KubeError::from)?;
        info!(
            kind = %gvk.kind,
            name = %result.name_any(),
            namespace = ?result.namespace(),
            "[ManifestService] Created object"
        );
        Ok(CreatedObject {
            kind: gvk.kind,
            name: result.name_any(),
            namespace: result.namespace(),
        })
    }
}
