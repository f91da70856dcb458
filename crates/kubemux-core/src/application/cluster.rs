//! Cluster Application Service
//!
//! Manages cluster records and drops cached connections whenever a record
//! changes underneath them.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Cluster, ClusterId, ClusterInput, ClusterResponse};
use crate::error::ClusterError;
use crate::repository::ClusterRepository;

/// Something holding per-cluster state that must be dropped when the
/// record it was built from changes.
pub trait ConnectionInvalidator: Send + Sync {
    fn invalidate(&self, id: ClusterId);
}

/// Application service for cluster record management
pub struct ClusterAppService {
    cluster_repo: Arc<dyn ClusterRepository>,
    invalidator: Option<Arc<dyn ConnectionInvalidator>>,
}

impl ClusterAppService {
    pub fn new(
        cluster_repo: Arc<dyn ClusterRepository>,
        invalidator: Option<Arc<dyn ConnectionInvalidator>>,
    ) -> Self {
        Self {
            cluster_repo,
            invalidator,
        }
    }

    /// List all clusters (token stripped)
    pub async fn list(&self) -> Result<Vec<ClusterResponse>, ClusterError> {
        let clusters = self.cluster_repo.list().await?;
        Ok(clusters.into_iter().map(ClusterResponse::from).collect())
    }

    /// Get a full cluster record
    pub async fn get(&self, id: ClusterId) -> Result<Cluster, ClusterError> {
        self.cluster_repo
            .get(id)
            .await?
            .ok_or(ClusterError::NotFound(id))
    }

    /// Register a new cluster
    pub async fn create(&self, input: &ClusterInput) -> Result<Cluster, ClusterError> {
        Self::validate(input)?;

        let name = input.name.trim();
        if self.cluster_repo.get_by_name(name).await?.is_some() {
            return Err(ClusterError::NameConflict(name.to_string()));
        }

        let cluster = self.cluster_repo.create(input).await?;
        info!(
            cluster_id = %cluster.id,
            name = %cluster.name,
            "[ClusterAppService] Created cluster"
        );
        Ok(cluster)
    }

    /// Replace the mutable fields of a cluster
    ///
    /// The cached connection for this cluster is dropped so the next
    /// request builds one from the new credentials.
    pub async fn update(
        &self,
        id: ClusterId,
        input: &ClusterInput,
    ) -> Result<Cluster, ClusterError> {
        Self::validate(input)?;

        let mut cluster = self.get(id).await?;

        let name = input.name.trim();
        if let Some(other) = self.cluster_repo.get_by_name(name).await? {
            if other.id != id {
                return Err(ClusterError::NameConflict(name.to_string()));
            }
        }

        cluster.apply(input);
        self.cluster_repo.update(&cluster).await?;
        self.invalidate(id);

        info!(cluster_id = %id, name = %cluster.name, "[ClusterAppService] Updated cluster");
        Ok(cluster)
    }

    /// Remove a cluster and its cached connection
    pub async fn delete(&self, id: ClusterId) -> Result<(), ClusterError> {
        if !self.cluster_repo.delete(id).await? {
            return Err(ClusterError::NotFound(id));
        }
        self.invalidate(id);

        info!(cluster_id = %id, "[ClusterAppService] Deleted cluster");
        Ok(())
    }

    fn validate(input: &ClusterInput) -> Result<(), ClusterError> {
        if input.name.trim().is_empty() {
            return Err(ClusterError::NameRequired);
        }
        if !input.credentials.is_usable() {
            return Err(ClusterError::NoCredentialsProvided);
        }
        Ok(())
    }

    fn invalidate(&self, id: ClusterId) {
        if let Some(invalidator) = &self.invalidator {
            debug!(cluster_id = %id, "[ClusterAppService] Invalidating cached connection");
            invalidator.invalidate(id);
        }
    }
}
