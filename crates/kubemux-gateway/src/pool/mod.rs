//! Connection pool
//!
//! One cached client handle per cluster id, built lazily on first use and
//! dropped only on explicit invalidation.

mod cache;
mod manager;

pub use cache::{ConnectionCache, PendingBuild};
pub use manager::ConnectionManager;
