//! KubeMux Storage Layer
//!
//! SQLite persistence for cluster records.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kubemux_storage::{Database, SqliteClusterRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Database::open(&path)?;
//! let db = Arc::new(Mutex::new(db));
//! let cluster_repo = SqliteClusterRepository::new(db.clone());
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;

/// Default database file name.
pub const DATABASE_FILE: &str = "kubemux.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| p.join(kubemux_core::branding::APP_ID).join(DATABASE_FILE))
}
