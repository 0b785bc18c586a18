//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌────────────────────────────────────────────┐
//! │  1. Environment Variables (SPECBUS_*)      │  Runtime override
//! ├────────────────────────────────────────────┤
//! │  2. Project Config (.specbus/config.toml)  │  Project-specific
//! ├────────────────────────────────────────────┤
//! │  3. Global Config (~/.specbus/config.toml) │  User defaults
//! ├────────────────────────────────────────────┤
//! │  4. Default Values (compile-time)          │  Fallback
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `SPECBUS_DEBUG` | `debug` | bool |
//! | `SPECBUS_CATCH_PANICS` | `dispatch.catch_panics` | bool |
//! | `SPECBUS_SLOW_HANDLER_MS` | `dispatch.slow_handler_warn_ms` | u64 |
//! | `SPECBUS_LOG_LEVEL` | `logging.level` | String |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.specbus/config.toml
//! debug = false
//!
//! [dispatch]
//! catch_panics = true
//! slow_handler_warn_ms = 50
//! trace_deliveries = false
//!
//! [logging]
//! level = "warn"
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{BusConfig, DispatchConfig, LoggingConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".specbus")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join(PROJECT_CONFIG_FILE)
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".specbus";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
