//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use specbus_runtime::config::BusConfig;
///
/// let config = BusConfig::default();
/// assert!(!config.debug);
/// assert!(config.dispatch.catch_panics);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BusConfig {
    /// Enable debug mode (debug-level logging).
    pub debug: bool,

    /// Dispatch loop configuration.
    pub dispatch: DispatchConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl BusConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.dispatch.merge(&other.dispatch);
        self.logging.merge(&other.logging);
    }

    /// Returns the effective log filter: `debug` wins over `logging.level`.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.logging.level
        }
    }
}

/// Dispatch loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Catch handler panics and report them like handler errors.
    ///
    /// When `false`, a panicking handler unwinds through `publish` and the
    /// remaining recipients of that dispatch are skipped.
    pub catch_panics: bool,

    /// Warn when a single handler runs at least this long (ms). `0` disables.
    pub slow_handler_warn_ms: u64,

    /// Log every delivery at debug level instead of trace.
    pub trace_deliveries: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            slow_handler_warn_ms: 50,
            trace_deliveries: false,
        }
    }
}

impl DispatchConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.catch_panics != default.catch_panics {
            self.catch_panics = other.catch_panics;
        }
        if other.slow_handler_warn_ms != default.slow_handler_warn_ms {
            self.slow_handler_warn_ms = other.slow_handler_warn_ms;
        }
        if other.trace_deliveries != default.trace_deliveries {
            self.trace_deliveries = other.trace_deliveries;
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, other: &Self) {
        if other.level != Self::default().level {
            self.level = other.level.clone();
        }
    }
}
