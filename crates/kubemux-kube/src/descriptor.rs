//! Normalized connection parameters
//!
//! A `ConnectionDescriptor` is what every credential form collapses into: a
//! fully loaded `kube::Config`. It is never persisted.

use std::fmt;

use kube::config::AuthInfo;
use kube::Config;
use secrecy::{ExposeSecret, SecretString};

/// Endpoint, auth and trust for one cluster.
#[derive(Clone)]
pub struct ConnectionDescriptor {
    endpoint: String,
    config: Config,
}

impl ConnectionDescriptor {
    pub fn from_config(config: Config) -> Self {
        let endpoint = config
            .cluster_url
            .to_string()
            .trim_end_matches('/')
            .to_string();
        Self { endpoint, config }
    }

    /// Unauthenticated descriptor for a bare endpoint.
    pub fn for_endpoint(endpoint: &str) -> Result<Self, String> {
        let uri = endpoint
            .trim_end_matches('/')
            .parse::<http::Uri>()
            .map_err(|e| format!("invalid server URL {:?}: {}", endpoint, e))?;
        Ok(Self::from_config(Config::new(uri)))
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_info = AuthInfo {
            token: Some(SecretString::from(token.into())),
            ..AuthInfo::default()
        };
        self
    }

    /// Accept any server certificate
    pub fn insecure(mut self) -> Self {
        self.config.accept_invalid_certs = true;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.config
            .auth_info
            .token
            .as_ref()
            .map(|token| token.expose_secret())
    }

    pub fn insecure_skip_verify(&self) -> bool {
        self.config.accept_invalid_certs
    }

    /// Which authentication mechanism the descriptor carries.
    pub fn auth_kind(&self) -> &'static str {
        let auth = &self.config.auth_info;
        if auth.exec.is_some() {
            "exec"
        } else if auth.auth_provider.is_some() {
            "auth-provider"
        } else if auth.token.is_some() || auth.token_file.is_some() {
            "token"
        } else if auth.client_certificate.is_some() || auth.client_certificate_data.is_some() {
            "client-certificate"
        } else if auth.username.is_some() {
            "basic"
        } else {
            "none"
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("endpoint", &self.endpoint)
            .field("auth", &self.auth_kind())
            .field("insecure", &self.insecure_skip_verify())
            .finish()
    }
}
