//! Error types
//!
//! `ConnectionError` covers everything that can go wrong between reading a
//! `cluster_id` off a request and holding a live client handle. The HTTP
//! layer is the only place that turns these into status codes.

use thiserror::Error;

use crate::domain::ClusterId;

/// Message returned whenever no usable credential form is present.
pub const NO_CREDENTIALS_MESSAGE: &str = "At least one connection method must be provided: \
1. kubeconfig content 2. kubeconfig file path 3. server URL and token";

/// Failure while turning a target identifier into a client handle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    /// The `cluster_id` value could not be parsed
    #[error("Invalid cluster ID: {0}")]
    InvalidTargetId(String),

    /// None of the three credential forms was populated
    #[error("{}", NO_CREDENTIALS_MESSAGE)]
    NoCredentialsProvided,

    /// Credentials were present but unusable (bad kubeconfig, unreadable file)
    #[error("{0}")]
    InvalidCredentials(String),

    /// No cluster record exists for the identifier
    #[error("Cluster not found: {0}")]
    RecordNotFound(ClusterId),

    /// Client construction failed
    #[error("Failed to create kubernetes client: {0}")]
    ConnectionFailed(String),

    /// Record lookup failed
    #[error("Failed to load cluster record: {0}")]
    Storage(String),

    /// The cache ended up in a state that should not be reachable
    #[error("Connection cache invariant violated: {0}")]
    CacheInvariantViolation(String),
}

impl ConnectionError {
    /// Short machine-readable kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTargetId(_) => "invalid_target_id",
            Self::NoCredentialsProvided => "no_credentials",
            Self::InvalidCredentials(_) => "invalid_credentials",
            Self::RecordNotFound(_) => "record_not_found",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::Storage(_) => "storage",
            Self::CacheInvariantViolation(_) => "cache_invariant",
        }
    }
}

/// Failure of a cluster record management operation.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Cluster name is required")]
    NameRequired,

    #[error("{}", NO_CREDENTIALS_MESSAGE)]
    NoCredentialsProvided,

    #[error("Cluster not found: {0}")]
    NotFound(ClusterId),

    #[error("Cluster name already exists: {0}")]
    NameConflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// A repository refused a write because another record holds the name.
///
/// Repositories return it inside their `anyhow::Error` so that a race the
/// name pre-check cannot see still ends as [`ClusterError::NameConflict`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cluster name already exists: {0}")]
pub struct DuplicateName(pub String);

impl From<anyhow::Error> for ClusterError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DuplicateName>() {
            Ok(DuplicateName(name)) => Self::NameConflict(name),
            Err(err) => Self::Storage(format!("{:#}", err)),
        }
    }
}
