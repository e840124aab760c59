//! Coordinator configuration.
//!
//! Defaults match the search UI: pages of 10, a 15 second ceiling per
//! backend call, and pagination stopping on a short *filtered* page.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading or validating a [`CoordinatorConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Which page size `has_more` compares against the requested limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasMoreBasis {
    /// Count of candidates that survived validation. A page where the
    /// validator rejected anything ends pagination.
    #[default]
    FilteredCount,
    /// Count of records the backend returned, before validation.
    RawCount,
}

/// Settings for a [`PaginatedSearchCoordinator`](crate::PaginatedSearchCoordinator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Records requested per page
    pub page_size: usize,
    /// Ceiling on a single backend call, in milliseconds
    pub fetch_timeout_ms: u64,
    pub has_more_basis: HasMoreBasis,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            fetch_timeout_ms: 15_000,
            has_more_basis: HasMoreBasis::FilteredCount,
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Configure the page size (default: 10)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Configure the per-call timeout (default: 15s)
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Configure how `has_more` is decided (default: filtered count)
    pub fn with_has_more_basis(mut self, basis: HasMoreBasis) -> Self {
        self.has_more_basis = basis;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
