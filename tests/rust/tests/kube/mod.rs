//! Kubernetes connectivity tests
//!
//! The default connection, exec credential plugins and the resource
//! services on top of a handle, against wiremock API servers.

mod exec_auth;
