//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BLOGVAULT_*)
//! 2. TOML config file (if BLOGVAULT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_INDEX_FILE;
use crate::cache::naming::DEFAULT_MAX_NAME_LEN;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BLOGVAULT_*)
/// 2. TOML config file (if BLOGVAULT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cache root holding the index and the `images/` directory.
    ///
    /// Set via BLOGVAULT_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Index filename inside the cache root.
    ///
    /// Set via BLOGVAULT_INDEX_FILE environment variable.
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Derived filenames keep at most this many trailing characters.
    ///
    /// Set via BLOGVAULT_MAX_NAME_LEN environment variable.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Whether HEIC/HEIF assets are rewritten as JPEG.
    ///
    /// Set via BLOGVAULT_NORMALIZE_FORMATS environment variable.
    #[serde(default = "default_true")]
    pub normalize_formats: bool,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via BLOGVAULT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per asset.
    ///
    /// Set via BLOGVAULT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via BLOGVAULT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.into()
}

fn default_max_name_len() -> usize {
    DEFAULT_MAX_NAME_LEN
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "blogvault/0.1".into()
}

fn default_max_bytes() -> usize {
    26_214_400 // 25MB
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            index_file: default_index_file(),
            max_name_len: default_max_name_len(),
            normalize_formats: true,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BLOGVAULT_`
    /// 2. TOML file from `BLOGVAULT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BLOGVAULT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BLOGVAULT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(figment)
    }

    /// Extract and validate a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
