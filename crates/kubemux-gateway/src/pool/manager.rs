//! Connection Manager
//!
//! Resolves a [`TargetId`] to a shared [`ClientHandle`]:
//!
//! - `Default` returns the handle supplied at startup, no record lookup.
//! - A cache hit returns immediately without I/O.
//! - A miss loads the cluster record, resolves credentials and builds a
//!   handle on the blocking pool, then publishes it for later requests.
//!
//! Failures are returned as-is and never cached. Concurrent misses for the
//! same id may each build; the last one to publish wins.

use std::sync::Arc;

use kubemux_core::{
    ClusterId, ClusterRepository, ConnectionError, ConnectionInvalidator, TargetId,
};
use kubemux_kube::{resolver, ClientHandle, ConnectionFactory};
use tracing::{debug, info, warn};

use super::cache::ConnectionCache;

/// Owns every per-cluster connection in the process.
///
/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct ConnectionManager {
    default_handle: Arc<ClientHandle>,
    cache: Arc<ConnectionCache>,
    factory: Arc<dyn ConnectionFactory>,
    cluster_repo: Arc<dyn ClusterRepository>,
}

impl ConnectionManager {
    pub fn new(
        default_handle: Arc<ClientHandle>,
        factory: Arc<dyn ConnectionFactory>,
        cluster_repo: Arc<dyn ClusterRepository>,
    ) -> Self {
        Self {
            default_handle,
            cache: Arc::new(ConnectionCache::new()),
            factory,
            cluster_repo,
        }
    }

    /// Handle for `target`, building one if needed.
    pub async fn resolve(&self, target: TargetId) -> Result<Arc<ClientHandle>, ConnectionError> {
        let id = match target {
            TargetId::Default => return Ok(self.default_handle.clone()),
            TargetId::Cluster(id) => id,
        };

        if let Some(handle) = self.cache.get(id) {
            debug!(cluster_id = %id, "[ConnectionManager] Cache hit");
            return Ok(handle);
        }

        // Registered before the record is read so an invalidation racing
        // with this build keeps the result out of the cache.
        let pending = self.cache.begin(id);

        let record = self
            .cluster_repo
            .get(id)
            .await
            .map_err(|e| ConnectionError::Storage(format!("{:#}", e)))?
            .ok_or(ConnectionError::RecordNotFound(id))?;

        debug!(
            cluster_id = %id,
            name = %record.name,
            "[ConnectionManager] Cache miss, building connection"
        );

        // The build runs in its own task so a cancelled request still
        // populates the cache for the next one.
        let factory = self.factory.clone();
        let build = tokio::spawn(async move {
            let descriptor = resolver::resolve(&record.credentials).await?;
            let handle = tokio::task::spawn_blocking(move || factory.build(descriptor))
                .await
                .map_err(|e| {
                    ConnectionError::CacheInvariantViolation(format!(
                        "connection build panicked: {}",
                        e
                    ))
                })??;

            let handle = Arc::new(handle);
            if pending.publish(handle.clone()) {
                info!(
                    cluster_id = %id,
                    endpoint = %handle.endpoint(),
                    "[ConnectionManager] Connection cached"
                );
            } else {
                debug!(
                    cluster_id = %id,
                    "[ConnectionManager] Invalidated during build, result not cached"
                );
            }
            Ok::<_, ConnectionError>(handle)
        });

        match build.await {
            Ok(Ok(handle)) => Ok(handle),
            Ok(Err(e)) => {
                warn!(
                    cluster_id = %id,
                    kind = e.kind(),
                    "[ConnectionManager] Connection build failed: {}",
                    e
                );
                Err(e)
            }
            Err(e) => Err(ConnectionError::CacheInvariantViolation(format!(
                "connection build task failed: {}",
                e
            ))),
        }
    }

    /// Drop the cached handle for `id`, if any.
    pub fn invalidate(&self, id: ClusterId) {
        if self.cache.invalidate(id) {
            info!(cluster_id = %id, "[ConnectionManager] Connection evicted");
        }
    }

    /// Number of cached cluster handles. The default handle is not counted.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn is_cached(&self, id: ClusterId) -> bool {
        self.cache.contains(id)
    }

    pub fn cached_ids(&self) -> Vec<ClusterId> {
        self.cache.ids()
    }

    /// Ids with a connection build in flight.
    pub fn pending_ids(&self) -> Vec<ClusterId> {
        self.cache.pending_ids()
    }

    pub fn default_handle(&self) -> &Arc<ClientHandle> {
        &self.default_handle
    }
}

impl ConnectionInvalidator for ConnectionManager {
    fn invalidate(&self, id: ClusterId) {
        ConnectionManager::invalidate(self, id);
    }
}
