//! Configuration types for the plug locator
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Locator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Maximum number of whole-network discovery rounds per resolve call
    ///
    /// A single broadcast round can miss a device that is temporarily slow
    /// to answer (duty-cycled radios, just-booted devices). Retrying whole
    /// sweeps rather than individual probes keeps the retry policy uniform.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl LocatorConfig {
    /// Create a configuration with the given attempt budget
    pub fn with_attempts(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_attempts == 0 {
            return Err(crate::Error::config("max_attempts must be at least 1"));
        }
        Ok(())
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

/// Address cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheConfig {
    /// File-based cache, one JSON file per application namespace
    File {
        /// Path to the cache file
        path: String,
    },

    /// In-memory cache (not persistent)
    #[default]
    Memory,
}

fn default_max_attempts() -> usize {
    1
}
