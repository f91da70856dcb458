//! Application service tests
//!
//! Cluster record management and the cache invalidation it triggers.
