//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `index_file` is empty or contains a path separator
    /// - `max_name_len` is below 8 or above 200 characters
    /// - `max_bytes` is 0 or exceeds 100MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_file.is_empty() {
            return Err(ConfigError::Invalid { field: "index_file".into(), reason: "must not be empty".into() });
        }
        if self.index_file.contains(['/', '\\']) {
            return Err(ConfigError::Invalid {
                field: "index_file".into(),
                reason: "must be a plain filename inside cache_dir".into(),
            });
        }

        if !(8..=200).contains(&self.max_name_len) {
            return Err(ConfigError::Invalid {
                field: "max_name_len".into(),
                reason: "must be between 8 and 200 characters".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 100 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 100MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if !self.index_file.ends_with(".json") {
            tracing::warn!(index_file = %self.index_file, "index_file does not end in .json; it is still written as JSON");
        }

        Ok(())
    }
}
