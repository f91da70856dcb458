//! Credential forms accepted for a cluster
//!
//! A cluster can be reached with one of three mutually exclusive forms:
//!
//! 1. inline kubeconfig text
//! 2. a kubeconfig file path
//! 3. an API server URL plus a bearer token
//!
//! The first populated form wins. Nothing is merged across forms and a
//! lower-priority form is never consulted once a higher one is present,
//! even if it is invalid. The same selection runs for record validation,
//! handle construction and connection probes.

use serde::{Deserialize, Serialize};

use crate::error::ConnectionError;

/// Raw credential fields as stored on a cluster record or sent in a probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCredentials {
    #[serde(default)]
    pub config_content: String,
    #[serde(default)]
    pub config_path: String,
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub token: String,
}

/// The credential form chosen by [`ClusterCredentials::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource<'a> {
    /// Kubeconfig document text
    Inline(&'a str),
    /// Path to a kubeconfig file
    File(&'a str),
    /// API server endpoint and bearer token
    Token { server_url: &'a str, token: &'a str },
}

impl CredentialSource<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inline(_) => "inline kubeconfig",
            Self::File(_) => "kubeconfig file",
            Self::Token { .. } => "server url and token",
        }
    }
}

fn populated(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl ClusterCredentials {
    /// Pick the credential form to use, by priority.
    pub fn select(&self) -> Result<CredentialSource<'_>, ConnectionError> {
        if populated(&self.config_content).is_some() {
            return Ok(CredentialSource::Inline(&self.config_content));
        }
        if let Some(path) = populated(&self.config_path) {
            return Ok(CredentialSource::File(path));
        }
        match (populated(&self.server_url), populated(&self.token)) {
            (Some(server_url), Some(token)) => Ok(CredentialSource::Token { server_url, token }),
            _ => Err(ConnectionError::NoCredentialsProvided),
        }
    }

    /// True when `select` would succeed.
    pub fn is_usable(&self) -> bool {
        self.select().is_ok()
    }
}
