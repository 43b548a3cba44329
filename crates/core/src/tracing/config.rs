//! Configuration for tracing output

use serde::{Deserialize, Serialize};

/// Main instrumentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name attached to the startup log line
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter (e.g., "info", "`depot_http=debug`")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "depot".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl InstrumentationConfig {
    /// Create configuration from environment variables
    ///
    /// Supports the following environment variables:
    /// - `SERVICE_NAME`: Service name
    /// - `RUST_LOG`: Log level filter
    /// - `DEPOT_LOG_JSON`: `1` or `true` for JSON output
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let service_name = std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name);
        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let json = std::env::var("DEPOT_LOG_JSON")
            .map(|v| matches!(v.as_str(), "1" | "true"))
            .unwrap_or(false);

        Self {
            service_name,
            service_version: defaults.service_version,
            log_level,
            json,
        }
    }

    /// Override the level filter
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
