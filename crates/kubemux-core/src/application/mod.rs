//! Application Services
//!
//! Application services sit between the HTTP handlers and the repositories.
//! They validate input, enforce business rules and keep dependent state
//! (the connection cache) in step with record changes.

mod cluster;

pub use cluster::{ClusterAppService, ConnectionInvalidator};
