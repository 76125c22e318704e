//! Runtime settings for the ingestion and retention jobs
//!
//! Settings come from an optional TOML file; every field has a default so
//! an empty file (or no file) is valid. Command-line flags override the
//! loaded values at the process boundary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::retry::RetryPolicy;

/// SQLite refuses statements with more bound parameters than this
pub const SQLITE_MAX_VARIABLES: usize = 32766;

/// Bound parameters per ranking entry (domain_id, list_id, rank)
pub const PARAMS_PER_ENTRY: usize = 3;

/// Largest batch whose multi-row insert stays under the parameter limit
pub const MAX_BATCH_SIZE: usize = SQLITE_MAX_VARIABLES / PARAMS_PER_ENTRY;

pub const DEFAULT_METADATA_ENDPOINT: &str = "https://tranco-list.eu/api/lists/date/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub database_path: PathBuf,
    /// Prefix the `YYYY-MM-DD` date is appended to
    pub metadata_endpoint: String,
    pub batch_size: usize,
    pub retention_days: i64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("toprank.db"),
            metadata_endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            batch_size: 10_000,
            retention_days: 100,
            retry_attempts: 3,
            retry_delay_ms: 1_000,
            http_timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            None => Settings::default(),
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                Self::from_toml(&raw).map_err(|e| match e {
                    ConfigError::Parse { reason, .. } => ConfigError::Parse {
                        path: path.display().to_string(),
                        reason,
                    },
                    other => other,
                })?
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text without validating them
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::Invalid {
                field: "batch_size",
                reason: format!("must be between 1 and {}", MAX_BATCH_SIZE),
            });
        }
        if self.retention_days < 0 {
            return Err(ConfigError::Invalid {
                field: "retention_days",
                reason: "must not be negative".to_string(),
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "retry_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.metadata_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "metadata_endpoint",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            self.retry_attempts,
            Duration::from_millis(self.retry_delay_ms),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
