//! SQLite repository implementations

mod cluster_repository;

pub use cluster_repository::SqliteClusterRepository;
