//! Client configuration
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! config file (TOML, YAML or JSON by extension), and `DEPOT_`-prefixed
//! environment variables. Nested keys use `__`, e.g. `DEPOT_AUTH__LOGIN_PATH`.

use crate::client::ClientError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default login endpoint
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Default token renewal endpoint
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DEPOT";

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Authentication endpoints
    pub auth: AuthEndpoints,

    /// Where the CLI persists the session; defaults to the data directory
    pub session_file: Option<PathBuf>,

    /// Share one renewal between concurrent requests that hit 401/403
    pub single_flight_renewal: bool,
}

/// Authentication endpoint paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEndpoints {
    pub login_path: String,
    pub refresh_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            user_agent: concat!("depot-client/", env!("CARGO_PKG_VERSION")).to_string(),
            auth: AuthEndpoints::default(),
            session_file: None,
            single_flight_renewal: true,
        }
    }
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from an optional file plus the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the wrong type
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        Self::load_with_env(path, None)
    }

    /// Load configuration with defaults and environment variables only
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> Result<Self, ClientError> {
        Self::load(None)
    }

    /// Load configuration, reading variables from `env` instead of the process
    /// environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ClientError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| ClientError::Configuration(e.to_string()))
    }

    /// Session file location, falling back to `<data dir>/depot/session.json`
    pub fn session_file_or_default(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("depot")
                .join("session.json")
        })
    }
}
