//! Mock implementations for testing
//!
//! In-memory repository plus instrumented factories and invalidators, so
//! tests can assert how often the connection layer touched each seam.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use chrono::Utc;
use kubemux_core::{
    Cluster, ClusterId, ClusterInput, ClusterRepository, ClusterStatus, ConnectionError,
    ConnectionInvalidator, RepoResult,
};
use kubemux_kube::{ClientHandle, ConnectionDescriptor, ConnectionFactory, KubeClientFactory};

// ============================================================================
// MockClusterRepository
// ============================================================================

pub struct MockClusterRepository {
    clusters: RwLock<HashMap<ClusterId, Cluster>>,
    next_id: AtomicU32,
    get_calls: AtomicUsize,
    failing: AtomicBool,
}

impl Default for MockClusterRepository {
    fn default() -> Self {
        Self {
            clusters: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(1),
            get_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }
}

impl MockClusterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(self, cluster: Cluster) -> Self {
        self.put(cluster);
        self
    }

    /// Insert or overwrite a record without going through the service layer.
    pub fn put(&self, cluster: Cluster) {
        self.next_id.fetch_max(cluster.id.get() + 1, Ordering::SeqCst);
        self.clusters.write().unwrap().insert(cluster.id, cluster);
    }

    /// Remove a record without going through the service layer.
    pub fn remove(&self, id: ClusterId) {
        self.clusters.write().unwrap().remove(&id);
    }

    /// Number of `get` calls so far.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Make every read fail like a broken database.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("database is locked");
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterRepository for MockClusterRepository {
    async fn list(&self) -> RepoResult<Vec<Cluster>> {
        self.check()?;
        let mut clusters: Vec<Cluster> = self.clusters.read().unwrap().values().cloned().collect();
        clusters.sort_by_key(|c| c.id);
        Ok(clusters)
    }

    async fn get(&self, id: ClusterId) -> RepoResult<Option<Cluster>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.clusters.read().unwrap().get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Cluster>> {
        self.check()?;
        Ok(self
            .clusters
            .read()
            .unwrap()
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn create(&self, input: &ClusterInput) -> RepoResult<Cluster> {
        self.check()?;
        let id = ClusterId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        let cluster = Cluster {
            id,
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            credentials: input.credentials.clone(),
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.clusters.write().unwrap().insert(id, cluster.clone());
        Ok(cluster)
    }

    async fn update(&self, cluster: &Cluster) -> RepoResult<()> {
        self.check()?;
        self.clusters
            .write()
            .unwrap()
            .insert(cluster.id, cluster.clone());
        Ok(())
    }

    async fn delete(&self, id: ClusterId) -> RepoResult<bool> {
        self.check()?;
        Ok(self.clusters.write().unwrap().remove(&id).is_some())
    }
}

/// Build a cluster record directly, bypassing validation.
pub fn cluster_record(
    id: u32,
    name: &str,
    credentials: kubemux_core::ClusterCredentials,
) -> Cluster {
    let now = Utc::now();
    Cluster {
        id: ClusterId(id),
        name: name.to_string(),
        description: String::new(),
        credentials,
        status: ClusterStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// CountingFactory
// ============================================================================

/// Real client factory that counts builds and can be told to fail.
#[derive(Default)]
pub struct CountingFactory {
    inner: KubeClientFactory,
    builds: AtomicUsize,
    failure: RwLock<Option<String>>,
    endpoints: Mutex<Vec<String>>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every build with `ConnectionFailed(message)`.
    pub fn failing(self, message: &str) -> Self {
        self.set_failure(Some(message));
        self
    }

    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.write().unwrap() = message.map(str::to_string);
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Endpoints of every build attempt, in order.
    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().unwrap().clone()
    }
}

impl ConnectionFactory for CountingFactory {
    fn build(&self, descriptor: ConnectionDescriptor) -> Result<ClientHandle, ConnectionError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.endpoints
            .lock()
            .unwrap()
            .push(descriptor.endpoint().to_string());

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(ConnectionError::ConnectionFailed(message));
        }
        self.inner.build(descriptor)
    }
}

// ============================================================================
// RecordingInvalidator
// ============================================================================

/// Remembers every id it was asked to invalidate.
#[derive(Default)]
pub struct RecordingInvalidator {
    ids: Mutex<Vec<ClusterId>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<ClusterId> {
        self.ids.lock().unwrap().clone()
    }
}

impl ConnectionInvalidator for RecordingInvalidator {
    fn invalidate(&self, id: ClusterId) {
        self.ids.lock().unwrap().push(id);
    }
}
