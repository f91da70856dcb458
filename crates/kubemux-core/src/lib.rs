//! # KubeMux Core Library
//!
//! Domain types and contracts shared by every KubeMux crate.
//!
//! ## Modules
//!
//! - `branding` - Product naming and defaults
//! - `domain` - Cluster records, target identifiers, credential selection
//! - `error` - Connection error taxonomy
//! - `repository` - Data access traits
//! - `application` - Cluster record management with cache invalidation

pub mod application;
pub mod branding;
pub mod domain;
pub mod error;
pub mod repository;

// Re-export commonly used types
pub use domain::*;
pub use error::{ClusterError, ConnectionError, DuplicateName};
pub use repository::*;

pub use application::{ClusterAppService, ConnectionInvalidator};
