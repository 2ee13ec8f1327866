//! # lrucache
//!
//! Bounded, thread-safe, recency-ordered cache.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to slab slot (O(1))
//! - **LRU List**: Intrusive doubly-linked list for promotion and eviction (O(1))
//! - **Locking**: One `parking_lot` mutex per cache guards index, list and capacity together
//!
//! ## Guarantees
//! - `count() <= capacity()` after every operation
//! - Eviction always removes the least recently touched entry
//! - A value is produced at most once per missing key, never on a hit
//! - Capacity can be changed at runtime; shrinking evicts oldest first

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod lru;
mod stats;

#[cfg(test)]
mod property_tests;

pub use cache::BoundedCache;
pub use config::{env_or, CacheConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use lru::{LruCache, Outcome};
pub use stats::{CacheStats, StatsSnapshot};
