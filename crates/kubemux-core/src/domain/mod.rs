//! Domain entities

mod cluster;
mod credentials;
mod target;

pub use cluster::{Cluster, ClusterInput, ClusterResponse, ClusterStatus};
pub use credentials::{ClusterCredentials, CredentialSource};
pub use target::{ClusterId, TargetId};
