//! Concurrent resolution tests

use std::sync::{Arc, Barrier};
use std::time::Duration;

use kubemux_core::{ClusterId, ConnectionError, TargetId};
use kubemux_kube::{ClientHandle, ConnectionDescriptor, ConnectionFactory, KubeClientFactory};
use tests::fixtures::{token_credentials, UNREACHABLE_SERVER};
use tests::mocks::{cluster_record, MockClusterRepository};

use super::{counting, manager};

/// Factory that parks every build until the test lets it go.
struct GatedFactory {
    inner: KubeClientFactory,
    entered: Barrier,
    release: Barrier,
}

impl GatedFactory {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: KubeClientFactory::default(),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        })
    }

    async fn wait_entered(self: &Arc<Self>) {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            this.entered.wait();
        })
        .await
        .unwrap();
    }

    async fn release(self: &Arc<Self>) {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            this.release.wait();
        })
        .await
        .unwrap();
    }
}

impl ConnectionFactory for GatedFactory {
    fn build(&self, descriptor: ConnectionDescriptor) -> Result<ClientHandle, ConnectionError> {
        self.entered.wait();
        self.release.wait();
        self.inner.build(descriptor)
    }
}

fn prod_repo() -> Arc<MockClusterRepository> {
    Arc::new(MockClusterRepository::new().with_cluster(cluster_record(
        7,
        "prod",
        token_credentials(UNREACHABLE_SERVER, "t"),
    )))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_all_succeed() {
    let repo = prod_repo();
    let factory = counting();
    let manager = manager(&repo, factory.clone());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.resolve(TargetId::Cluster(ClusterId(7))).await })
        })
        .collect();

    for task in tasks {
        let handle = task.await.unwrap().unwrap();
        assert_eq!(handle.endpoint(), UNREACHABLE_SERVER);
    }

    // Builds may overlap, but exactly one handle stays cached
    assert_eq!(manager.len(), 1);
    assert!((1..=16).contains(&factory.builds()));

    let cached = manager.resolve(TargetId::Cluster(ClusterId(7))).await.unwrap();
    let again = manager.resolve(TargetId::Cluster(ClusterId(7))).await.unwrap();
    assert!(Arc::ptr_eq(&cached, &again));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalidation_during_build_keeps_result_out_of_cache() {
    let repo = prod_repo();
    let factory = GatedFactory::new();
    let manager = manager(&repo, factory.clone());

    let pending = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.resolve(TargetId::Cluster(ClusterId(7))).await })
    };

    factory.wait_entered().await;
    manager.invalidate(ClusterId(7));
    factory.release().await;

    // The caller still gets its handle; later requests must rebuild
    let handle = pending.await.unwrap().unwrap();
    assert_eq!(handle.endpoint(), UNREACHABLE_SERVER);
    assert!(!manager.is_cached(ClusterId(7)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_request_still_populates_cache() {
    let repo = prod_repo();
    let factory = GatedFactory::new();
    let manager = manager(&repo, factory.clone());

    let pending = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.resolve(TargetId::Cluster(ClusterId(7))).await })
    };

    factory.wait_entered().await;
    pending.abort();
    factory.release().await;

    let cached = tokio::time::timeout(Duration::from_secs(5), async {
        while !manager.is_cached(ClusterId(7)) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(cached.is_ok(), "build finished after cancellation but was not cached");
}
