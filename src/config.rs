//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// File cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Range checks happen when the cache is created, not here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Initial index capacity, 0 selects the engine default
    pub index_hint: usize,
    /// Directory that requested paths are resolved against
    pub root: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10)
    /// - `CACHE_INDEX_HINT` - Index sizing hint (default: 0)
    /// - `CACHE_ROOT` - Directory to serve files from (default: `.`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            index_hint: env::var("CACHE_INDEX_HINT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.index_hint),
            root: env::var_os("CACHE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.root),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10,
            index_hint: 0,
            root: PathBuf::from("."),
        }
    }
}
