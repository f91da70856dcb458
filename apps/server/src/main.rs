//! KubeMux server
//!
//! Multi-cluster Kubernetes admin API: one HTTP surface, one cached
//! connection per registered cluster.

mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use kubemux_core::branding;
use kubemux_gateway::{DependenciesBuilder, GatewayServer};
use kubemux_kube::{defaults, KubeClientFactory};
use kubemux_storage::{Database, SqliteClusterRepository};
use tokio::sync::Mutex;
use tracing::{error, info};

use config::{DatabaseLocation, ServerConfig};

/// Console plus daily-rotated file logging.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(logs_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {:?}", logs_dir))?;

    // Creates files like: kubemux.2026-01-22.log
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(branding::LOG_PREFIX)
        .filename_suffix("log")
        .build(logs_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins; otherwise info, with our crates at debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,kubemux_core=debug,kubemux_gateway=debug,kubemux_kube=debug,kubemux_storage=debug,kubemux=debug")
    });

    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn open_database(location: &DatabaseLocation) -> Result<Database> {
    match location {
        DatabaseLocation::InMemory => {
            info!("[Server] Using in-memory database");
            Database::open_in_memory()
        }
        DatabaseLocation::File(path) => {
            info!("[Server] Using database {:?}", path);
            Database::open(path)
        }
    }
}

async fn run(config: ServerConfig) -> Result<()> {
    let db = Arc::new(Mutex::new(open_database(&config.database)?));
    let cluster_repo = Arc::new(SqliteClusterRepository::new(db));

    let factory_config = config.factory_config();
    let factory = Arc::new(KubeClientFactory::new(factory_config.clone()));

    let default_handle =
        defaults::build_default_handle(factory.as_ref(), config.kubeconfig.as_deref())
            .await
            .context("Failed to initialize the default cluster connection")?;
    info!(
        endpoint = %default_handle.endpoint(),
        "[Server] Default cluster connection ready"
    );

    let dependencies = DependenciesBuilder::new()
        .with_cluster_repo(cluster_repo)
        .with_factory(factory)
        .with_default_handle(Arc::new(default_handle))
        .with_factory_config(factory_config)
        .build()
        .map_err(anyhow::Error::msg)?;

    GatewayServer::new(config.gateway, dependencies).run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    let _guard = init_tracing(&config.log_dir)?;

    info!("[Server] {} v{} starting", branding::DISPLAY_NAME, branding::VERSION);

    if let Err(e) = run(config).await {
        error!("[Server] Fatal: {:#}", e);
        return Err(e);
    }
    Ok(())
}
