//! Address engine configuration loading
//!
//! Loads configuration from `~/.config/shopfront/address.toml` (or
//! `SHOPFRONT_ADDRESS_CONFIG` env). Every key is optional.

use crate::errors::{AddressError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for the address engine
#[derive(Debug, Deserialize, Clone)]
pub struct AddressConfig {
    /// Base URL of the storefront API serving `/api/utils/address-*`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout for lookup and retrieve calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Master switch for address lookup; when off every search is empty
    #[serde(default = "default_lookup_enabled")]
    pub lookup_enabled: bool,

    /// Maximum suggestions kept from a single search (0 = no limit)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_lookup_enabled() -> bool {
    true
}

fn default_max_results() -> usize {
    20
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            lookup_enabled: default_lookup_enabled(),
            max_results: default_max_results(),
        }
    }
}

impl AddressConfig {
    /// Environment variable for config path override
    pub const ENV_CONFIG_PATH: &'static str = "SHOPFRONT_ADDRESS_CONFIG";

    /// Default config filename
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "address.toml";

    /// Load configuration from file
    ///
    /// Resolution order:
    /// 1. `SHOPFRONT_ADDRESS_CONFIG` environment variable
    /// 2. `~/.config/shopfront/address.toml`
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::resolve_config_path();

        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "Address config not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AddressError::config_with_source(
                format!("failed to read config at {}", path.display()),
                e,
            )
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: AddressConfig = toml::from_str(contents)
            .map_err(|e| AddressError::config_with_source("failed to parse config", e))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve the configuration file path
    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("shopfront")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    fn validate(&self) -> Result<()> {
        if let Err(e) = url::Url::parse(&self.api_base_url) {
            return Err(AddressError::config_with_source(
                format!("api_base_url is not a valid URL: {}", self.api_base_url),
                e,
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(AddressError::config(
                "request_timeout_secs must be greater than zero",
            ));
        }

        if !self.lookup_enabled {
            tracing::warn!("Address lookup disabled; users will enter addresses manually");
        }

        Ok(())
    }

    /// Replace the API base URL (e.g. from a command line flag) and
    /// re-validate the result.
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Result<Self> {
        self.api_base_url = api_base_url.into();
        self.validate()?;
        Ok(self)
    }

    /// Request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
