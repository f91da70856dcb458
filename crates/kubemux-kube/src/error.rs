//! Errors from calls against a cluster API server

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KubeError {
    /// The API server answered with a non-success status
    #[error("{message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not match the expected schema
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl KubeError {
    /// HTTP status reported by the API server, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<kube::Error> for KubeError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => Self::Api {
                status: response.code,
                reason: response.reason,
                message: response.message,
            },
            kube::Error::SerdeError(e) => Self::Decode(e.to_string()),
            other => Self::Transport(error_chain(&other)),
        }
    }
}

/// Render an error with all of its sources, `outer: inner: root`.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // Wrappers often repeat their source verbatim
        if !rendered.ends_with(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}
