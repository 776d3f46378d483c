//! User-level configuration loaded from `~/.itemdeck/config.toml`.
//!
//! This file is optional; if it does not exist all fields fall back to their
//! `Default` values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::rate_limit::{RateLimitPolicy, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS};
use crate::store::{DEFAULT_LIMIT, DEFAULT_SEED_COUNT, MAX_LIMIT, MAX_SEED_COUNT};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("Failed to read user config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse user config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid user config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Store settings (`[store]` table in the TOML file).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Number of `item-N` entries created at startup.
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
}

fn default_seed_count() -> usize {
    DEFAULT_SEED_COUNT
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_count: default_seed_count(),
        }
    }
}

/// List query settings (`[query]` table in the TOML file).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Page size used when a request leaves `limit` unset.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

/// Per-client rate limiting (`[rate_limit]` table in the TOML file).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,
    /// Requests each client IP may make per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    DEFAULT_MAX_REQUESTS
}

fn default_window_secs() -> u64 {
    DEFAULT_WINDOW_SECS
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    /// The limiter policy, or `None` when rate limiting is turned off.
    #[must_use]
    pub fn policy(&self) -> Option<RateLimitPolicy> {
        self.enabled.then(|| RateLimitPolicy {
            max_requests: self.max_requests,
            window: Duration::from_secs(self.window_secs),
        })
    }

    fn validate(&self) -> Result<(), UserConfigError> {
        if self.max_requests == 0 {
            return Err(UserConfigError::Invalid(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }
        if self.window_secs == 0 {
            return Err(UserConfigError::Invalid(
                "rate_limit.window_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level user configuration, deserialized from
/// `~/.itemdeck/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl UserConfig {
    /// Reject values the service cannot honour.
    pub fn validate(&self) -> Result<(), UserConfigError> {
        if self.query.default_limit == 0 || self.query.default_limit > MAX_LIMIT {
            return Err(UserConfigError::Invalid(format!(
                "query.default_limit must be between 1 and {MAX_LIMIT}, got {}",
                self.query.default_limit
            )));
        }
        check_seed_count(self.store.seed_count)?;
        self.rate_limit.validate()
    }
}

/// Reject seed counts above [`MAX_SEED_COUNT`]. Also applied to the
/// `--seed-count` override.
pub fn check_seed_count(count: usize) -> Result<usize, UserConfigError> {
    if count > MAX_SEED_COUNT {
        return Err(UserConfigError::Invalid(format!(
            "store.seed_count must be at most {MAX_SEED_COUNT}, got {count}"
        )));
    }
    Ok(count)
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Resolve the canonical path for the user config file (`~/.itemdeck/config.toml`).
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".itemdeck").join("config.toml"))
}

/// Parse and validate a config document.
pub fn parse_user_config(content: &str) -> Result<UserConfig, UserConfigError> {
    let config: UserConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file, returning defaults when it does not exist.
pub fn load_user_config_from(path: &Path) -> Result<UserConfig, UserConfigError> {
    if !path.exists() {
        debug!(
            "User config not found at {}; using defaults",
            path.display()
        );
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = parse_user_config(&content)?;
    debug!("Loaded user config from {}", path.display());
    Ok(config)
}

/// Load the user configuration from `~/.itemdeck/config.toml`.
///
/// Returns `Ok(UserConfig::default())` if the file does not exist.
pub fn load_user_config() -> Result<UserConfig, UserConfigError> {
    let Some(path) = user_config_path() else {
        warn!("Could not determine user config directory; using defaults");
        return Ok(UserConfig::default());
    };
    load_user_config_from(&path)
}

#[cfg(test)]
#[path = "user_config_tests.rs"]
mod user_config_tests;
