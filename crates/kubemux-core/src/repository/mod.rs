//! Repository traits for data access
//!
//! These traits define the interface for data storage without specifying
//! the implementation (SQLite, in-memory, etc.)

use async_trait::async_trait;

use crate::domain::{Cluster, ClusterId, ClusterInput};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Cluster record repository trait
#[async_trait]
pub trait ClusterRepository: Send + Sync {
    /// Get all clusters, ordered by id
    async fn list(&self) -> RepoResult<Vec<Cluster>>;

    /// Get a cluster by ID
    async fn get(&self, id: ClusterId) -> RepoResult<Option<Cluster>>;

    /// Get a cluster by its unique name
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Cluster>>;

    /// Insert a new cluster and return the stored record
    async fn create(&self, input: &ClusterInput) -> RepoResult<Cluster>;

    /// Overwrite an existing cluster
    async fn update(&self, cluster: &Cluster) -> RepoResult<()>;

    /// Delete a cluster. Returns false when nothing was deleted.
    async fn delete(&self, id: ClusterId) -> RepoResult<bool>;
}
