//! KubeMux Gateway
//!
//! HTTP front end for many clusters at once. Every resource request names
//! its target with `cluster_id`; the gateway resolves that to a cached
//! client handle and binds per-resource services to the request.
//!
//! # Architecture
//!
//! ```text
//!  request ──▶ logging ──▶ cluster binder ──▶ resource handler
//!                               │                    ▲
//!                               ▼                    │
//!                       ConnectionManager ──▶ ClusterServices
//!                        │            │
//!              ClusterRepository   ConnectionFactory
//! ```

pub mod logging;
pub mod pool;
pub mod server;
pub mod services;

pub use pool::ConnectionManager;
pub use server::{
    ApiError, ApiResponse, DependenciesBuilder, GatewayConfig, GatewayDependencies, GatewayServer,
};
pub use services::ClusterServices;
