//! Cache configuration
//!
//! Values come from environment variables with sensible defaults.

use std::env;

/// Default number of entries a cache holds
pub const DEFAULT_CAPACITY: usize = 1000;

/// Cache configuration parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
}

impl CacheConfig {
    /// Load configuration from the environment
    ///
    /// # Environment Variables
    /// - `LRUCACHE_CAPACITY` - Maximum cache entries (default: 1000)
    pub fn from_env() -> Self {
        Self {
            capacity: env_or("LRUCACHE_CAPACITY", DEFAULT_CAPACITY),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Parse an environment variable, falling back to `default` when it is
/// unset or malformed
pub fn env_or(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
