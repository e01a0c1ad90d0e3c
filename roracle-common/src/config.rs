//! Configuration loading and API base URL resolution
//!
//! Base URL priority order:
//! 1. Command-line argument (highest priority)
//! 2. `RORACLE_API_URL` environment variable
//! 3. TOML config file (`api_base_url`)
//! 4. Compiled default
//!
//! A missing or unparsable TOML file never aborts startup; the caller logs a
//! warning and continues with defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.roracle.org";
pub const API_URL_ENV_VAR: &str = "RORACLE_API_URL";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the RORacle API
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Address the JSON surface binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Per-request timeout for API calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Affiliation lookups in flight at once
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            bind_address: default_bind_address(),
            request_timeout_secs: default_request_timeout_secs(),
            lookup_concurrency: default_lookup_concurrency(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:5780".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_lookup_concurrency() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform config file: `<config dir>/roracle/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("roracle").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub bind_address: String,
    pub request_timeout: Duration,
    pub lookup_concurrency: usize,
    pub log_level: String,
}

/// Resolves settings from CLI, environment, TOML and compiled defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_api_url: Option<String>,
    cli_config_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.cli_api_url = api_url;
        self
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_config_path = path;
        self
    }

    /// Config file to read: the explicit path, else the platform default
    pub fn config_path(&self) -> Option<PathBuf> {
        self.cli_config_path.clone().or_else(default_config_path)
    }

    /// Load the TOML file.
    ///
    /// `Ok(None)` when the platform default file does not exist. An explicit
    /// `--config` path that cannot be read is an error.
    pub fn load(&self) -> Result<Option<TomlConfig>> {
        let Some(path) = self.config_path() else {
            return Ok(None);
        };

        if self.cli_config_path.is_none() && !path.exists() {
            return Ok(None);
        }

        load_toml_config(&path).map(Some)
    }

    /// Combine `toml` with CLI and environment overrides
    pub fn resolve(&self, toml: TomlConfig) -> ResolvedConfig {
        let api_base_url = if let Some(url) = &self.cli_api_url {
            debug!("API base URL from command line");
            url.clone()
        } else if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
            debug!("API base URL from {}", API_URL_ENV_VAR);
            url
        } else if let Some(url) = toml.api_base_url.clone() {
            debug!("API base URL from config file");
            url
        } else {
            DEFAULT_API_BASE_URL.to_string()
        };
        let api_base_url = normalize_base_url(&api_base_url);

        info!(api_base_url = %api_base_url, "Resolved RORacle API");

        ResolvedConfig {
            api_base_url,
            bind_address: toml.bind_address,
            request_timeout: Duration::from_secs(toml.request_timeout_secs.max(1)),
            lookup_concurrency: toml.lookup_concurrency.max(1),
            log_level: toml.logging.level,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
