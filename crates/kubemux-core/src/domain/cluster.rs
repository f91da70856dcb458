//! Cluster entity - persisted description of how to reach one cluster

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClusterCredentials, ClusterId};

/// Operator-assigned status label. Never derived from live probing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    #[default]
    Active,
    Inactive,
    Error,
}

impl ClusterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown cluster status: {}", other)),
        }
    }
}

/// A registered cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,

    /// Unique, human-readable name
    pub name: String,

    pub description: String,

    /// Credential fields, exactly as stored
    #[serde(flatten)]
    pub credentials: ClusterCredentials,

    pub status: ClusterStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cluster {
    /// Apply a create/update payload to this record.
    pub fn apply(&mut self, input: &ClusterInput) {
        self.name = input.name.trim().to_string();
        self.description = input.description.clone();
        self.credentials = input.credentials.clone();
        if let Some(status) = input.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Create/update payload for a cluster record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub credentials: ClusterCredentials,
    #[serde(default)]
    pub status: Option<ClusterStatus>,
}

impl ClusterInput {
    pub fn new(name: impl Into<String>, credentials: ClusterCredentials) -> Self {
        Self {
            name: name.into(),
            credentials,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: ClusterStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Outbound view of a cluster record. The bearer token never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterResponse {
    pub id: ClusterId,
    pub name: String,
    pub description: String,
    pub server_url: String,
    pub config_path: String,
    pub config_content: String,
    pub status: ClusterStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cluster> for ClusterResponse {
    fn from(cluster: Cluster) -> Self {
        Self {
            id: cluster.id,
            name: cluster.name,
            description: cluster.description,
            server_url: cluster.credentials.server_url,
            config_path: cluster.credentials.config_path,
            config_content: cluster.credentials.config_content,
            status: cluster.status,
            created_at: cluster.created_at,
            updated_at: cluster.updated_at,
        }
    }
}
