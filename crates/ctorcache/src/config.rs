//! Factory configuration
//!
//! Cache sizes for each constructor family, loaded from environment
//! variables with sensible defaults.

use lrucache::env_or;

/// Default number of signatures each family keeps
pub const DEFAULT_FAMILY_CAPACITY: usize = 64;

/// Per-family constructor cache sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Signatures kept by the either family
    pub either_capacity: usize,
    /// Element types kept by the list family
    pub list_capacity: usize,
    /// Key/value pairs kept by the map family
    pub map_capacity: usize,
    /// Types kept by the option family
    pub option_capacity: usize,
    /// Types kept by the result family
    pub result_capacity: usize,
}

impl FactoryConfig {
    /// Load configuration from the environment
    ///
    /// # Environment Variables
    /// - `CTORCACHE_EITHER_CAPACITY` (default: 64)
    /// - `CTORCACHE_LIST_CAPACITY` (default: 64)
    /// - `CTORCACHE_MAP_CAPACITY` (default: 64)
    /// - `CTORCACHE_OPTION_CAPACITY` (default: 64)
    /// - `CTORCACHE_RESULT_CAPACITY` (default: 64)
    pub fn from_env() -> Self {
        Self {
            either_capacity: env_or("CTORCACHE_EITHER_CAPACITY", DEFAULT_FAMILY_CAPACITY),
            list_capacity: env_or("CTORCACHE_LIST_CAPACITY", DEFAULT_FAMILY_CAPACITY),
            map_capacity: env_or("CTORCACHE_MAP_CAPACITY", DEFAULT_FAMILY_CAPACITY),
            option_capacity: env_or("CTORCACHE_OPTION_CAPACITY", DEFAULT_FAMILY_CAPACITY),
            result_capacity: env_or("CTORCACHE_RESULT_CAPACITY", DEFAULT_FAMILY_CAPACITY),
        }
    }

    /// Same capacity for every family
    pub fn uniform(capacity: usize) -> Self {
        Self {
            either_capacity: capacity,
            list_capacity: capacity,
            map_capacity: capacity,
            option_capacity: capacity,
            result_capacity: capacity,
        }
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_FAMILY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_default() {
        let config = FactoryConfig::default();
        assert_eq!(config.either_capacity, 64);
        assert_eq!(config.result_capacity, 64);
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("CTORCACHE_MAP_CAPACITY", "3");
        env::remove_var("CTORCACHE_LIST_CAPACITY");

        let config = FactoryConfig::from_env();
        assert_eq!(config.map_capacity, 3);
        assert_eq!(config.list_capacity, DEFAULT_FAMILY_CAPACITY);

        env::remove_var("CTORCACHE_MAP_CAPACITY");
    }
}
