//! Server configuration from the environment
//!
//! | Variable | Default |
//! |---|---|
//! | `KUBEMUX_HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `KUBECONFIG` | `~/.kube/config` |
//! | `KUBEMUX_DATABASE` | `<local data dir>/kubemux/kubemux.db`, or `:memory:` |
//! | `KUBEMUX_LOG_DIR` | `<local data dir>/kubemux/logs` |
//! | `KUBEMUX_CORS` | `true` |
//! | `KUBEMUX_REQUEST_TIMEOUT_SECS` | `30` |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use kubemux_core::branding;
use kubemux_gateway::GatewayConfig;
use kubemux_kube::FactoryConfig;

const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub gateway: GatewayConfig,
    pub kubeconfig: Option<PathBuf>,
    pub database: DatabaseLocation,
    pub log_dir: PathBuf,
    pub request_timeout: Duration,
}

fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(branding::APP_ID)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{} must be true or false, got {:?}", name, other),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = GatewayConfig::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => defaults.port,
        };

        let enable_cors = match get("KUBEMUX_CORS") {
            Some(raw) => parse_bool("KUBEMUX_CORS", &raw)?,
            None => defaults.enable_cors,
        };

        let request_timeout = match get("KUBEMUX_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().with_context(|| {
                format!("KUBEMUX_REQUEST_TIMEOUT_SECS must be whole seconds, got {:?}", raw)
            })?),
            None => FactoryConfig::default().request_timeout,
        };

        let kubeconfig = get("KUBECONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".kube").join("config")));

        let database = match get("KUBEMUX_DATABASE") {
            Some(raw) if raw.trim() == IN_MEMORY => DatabaseLocation::InMemory,
            Some(raw) => DatabaseLocation::File(PathBuf::from(raw)),
            None => DatabaseLocation::File(app_data_dir().join(kubemux_storage::DATABASE_FILE)),
        };

        let log_dir = get("KUBEMUX_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| app_data_dir().join("logs"));

        Ok(Self {
            gateway: GatewayConfig {
                host: get("KUBEMUX_HOST").unwrap_or(defaults.host),
                port,
                enable_cors,
            },
            kubeconfig,
            database,
            log_dir,
            request_timeout,
        })
    }

    pub fn factory_config(&self) -> FactoryConfig {
        FactoryConfig::default().with_request_timeout(self.request_timeout)
    }
}
