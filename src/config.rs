//! Configuration Module
//!
//! Handles loading and validating cache configuration.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default maximum number of entries.
pub const DEFAULT_MAX_ITEMS: usize = 1000;

/// Default number of worker threads for a dedicated expiry runtime.
pub const DEFAULT_EXPIRY_WORKERS: usize = 1;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables or deserialized
/// from an embedding application's config, with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_items: usize,
    /// Worker threads for the expiry runtime, used only when the cache is
    /// built outside of a tokio runtime
    pub expiry_workers: usize,
}

impl CacheConfig {
    /// Creates a config with the given capacity and default expiry settings.
    pub fn with_max_items(max_items: usize) -> Self {
        Self {
            max_items,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_MAX_ITEMS` - Maximum cache entries (default: 1000)
    /// - `LRU_EXPIRY_WORKERS` - Expiry runtime worker threads (default: 1)
    pub fn from_env() -> Self {
        Self {
            max_items: env::var("LRU_MAX_ITEMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ITEMS),
            expiry_workers: env::var("LRU_EXPIRY_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EXPIRY_WORKERS),
        }
    }

    /// Checks that every value is within range.
    pub fn validate(&self) -> Result<()> {
        if self.max_items == 0 {
            return Err(CacheError::InvalidConfig(
                "max_items must be greater than 0".to_string(),
            ));
        }
        if self.expiry_workers == 0 {
            return Err(CacheError::InvalidConfig(
                "expiry_workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            expiry_workers: DEFAULT_EXPIRY_WORKERS,
        }
    }
}
