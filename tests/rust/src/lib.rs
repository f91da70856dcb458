//! Shared test utilities and fixtures for KubeMux integration tests.

pub use kubemux_core::{Cluster, ClusterCredentials, ClusterId, ClusterInput, TargetId};

/// Mock repository and factory implementations
pub mod mocks;
pub use mocks::{CountingFactory, MockClusterRepository, RecordingInvalidator};

/// Router-level test harness
pub mod harness;
pub use harness::GatewayTestHarness;

/// Credential fixtures
pub mod fixtures {
    use kubemux_core::ClusterCredentials;

    /// Kubeconfig with a single context pointing at `server`.
    pub fn kubeconfig_yaml(server: &str, token: &str) -> String {
        format!(
            r#"apiVersion: v1
kind: Config
current-context: test
clusters:
  - name: test
    cluster:
      server: {server}
      insecure-skip-tls-verify: true
users:
  - name: test
    user:
      token: {token}
contexts:
  - name: test
    context:
      cluster: test
      user: test
"#
        )
    }

    pub fn token_credentials(server: &str, token: &str) -> ClusterCredentials {
        ClusterCredentials {
            server_url: server.to_string(),
            token: token.to_string(),
            ..Default::default()
        }
    }

    pub fn inline_credentials(server: &str) -> ClusterCredentials {
        ClusterCredentials {
            config_content: kubeconfig_yaml(server, "inline-token"),
            ..Default::default()
        }
    }

    pub fn file_credentials(path: &std::path::Path) -> ClusterCredentials {
        ClusterCredentials {
            config_path: path.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    /// A kubeconfig file written to `dir`.
    pub fn write_kubeconfig(dir: &std::path::Path, server: &str) -> std::path::PathBuf {
        let path = dir.join("config");
        std::fs::write(&path, kubeconfig_yaml(server, "file-token"))
            .expect("Failed to write kubeconfig");
        path
    }

    /// Address nothing listens on; builds succeed, requests fail.
    pub const UNREACHABLE_SERVER: &str = "https://192.0.2.1:6443";
}

/// Database test helpers
pub mod db {
    use kubemux_storage::{Database, SqliteClusterRepository, DATABASE_FILE};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// A migrated database that lives as long as this value.
    pub struct TestDatabase {
        pub db: Arc<Mutex<Database>>,
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        /// Create a new test database in a temporary directory
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join(DATABASE_FILE);
            let db = Database::open(&db_path).expect("Failed to open test database");
            Self {
                db: Arc::new(Mutex::new(db)),
                db_path,
                _temp_dir: temp_dir,
            }
        }

        /// Create an in-memory database for fast tests
        pub fn in_memory() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db = Database::open_in_memory().expect("Failed to open in-memory database");
            Self {
                db: Arc::new(Mutex::new(db)),
                db_path: PathBuf::new(),
                _temp_dir: temp_dir,
            }
        }

        pub fn repository(&self) -> SqliteClusterRepository {
            SqliteClusterRepository::new(self.db.clone())
        }

        /// Get the database directory path
        pub fn path(&self) -> &Path {
            self._temp_dir.path()
        }

        /// Get the full database file path
        pub fn db_path(&self) -> &Path {
            &self.db_path
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }
}
