//! Kubernetes connectivity for KubeMux
//!
//! Turns stored credentials into live API clients:
//!
//! ```text
//! ClusterCredentials ──resolve──▶ ConnectionDescriptor ──ConnectionFactory──▶ ClientHandle
//!                                         │
//!                                         └──probe──▶ ProbeResult
//! ```
//!
//! Kubeconfig parsing, auth plugins (exec, auth-provider, client
//! certificates) and the transport all come from the `kube` crate; this
//! crate decides which credential form applies and how clients are built.
//!
//! - `resolver` - credential form selection into a descriptor
//! - `factory` - handle construction
//! - `metrics` - metrics.k8s.io node usage
//! - `defaults` - the process-wide default connection (kubeconfig or in-cluster)

pub mod defaults;
mod descriptor;
mod error;
pub mod factory;
mod handle;
pub mod metrics;
mod probe;
pub mod resolver;

pub use descriptor::ConnectionDescriptor;
pub use error::KubeError;
pub use factory::{ConnectionFactory, FactoryConfig, KubeClientFactory};
pub use handle::ClientHandle;
pub use metrics::{MetricsClient, NodeMetrics};
pub use probe::{probe, probe_credentials, ProbeResult};
pub use resolver::resolve;
