//! Centralized branding constants
//!
//! All product naming comes from this module.
//!
//! ```rust
//! use kubemux_core::branding;
//!
//! println!("App: {} v{}", branding::DISPLAY_NAME, branding::VERSION);
//! ```

/// Human readable product name
pub const DISPLAY_NAME: &str = "KubeMux";

/// Identifier used for directories, log files and the database
pub const APP_ID: &str = "kubemux";

/// Prefix of the rolling log files (`kubemux.2026-01-22.log`)
pub const LOG_PREFIX: &str = "kubemux";

/// Port the HTTP API listens on when `PORT` is unset
pub const DEFAULT_PORT: u16 = 8080;

/// Version of the running binary
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
