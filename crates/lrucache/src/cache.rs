//! BoundedCache: thread-safe LRU cache engine

use std::fmt;
use std::hash::Hash;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::lru::{LruCache, Outcome};
use crate::stats::CacheStats;

/// Bounded key-value cache with LRU eviction, safe for concurrent callers
///
/// The key index, the recency list and the capacity form a single unit
/// guarded by one mutex. Every operation, including a plain hit, runs as one
/// critical section, and the `produce` callback of
/// [`get_or_insert`](Self::get_or_insert) runs inside it. At most one value
/// is ever produced for a missing key, even under contention.
///
/// The mutex is not reentrant: a `produce` callback must not call back into
/// the same cache, or the calling thread deadlocks.
pub struct BoundedCache<K, V> {
    /// Recency-ordered entries
    inner: Mutex<LruCache<K, V>>,

    /// Cache statistics
    stats: CacheStats,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            stats: CacheStats::new(),
        }
    }

    /// Create a new cache from configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Get a cached value, promoting it to most recent
    ///
    /// A miss has no side effect on the cache.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut lru = self.inner.lock();
        match lru.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Return the cached value for `key`, or produce and cache a new one
    ///
    /// `produce` is called at most once, and never on a [`Outcome::Hit`].
    /// When the cache is full the least recently used entry is evicted to
    /// make room. With a capacity of zero the produced value is returned
    /// with [`Outcome::RejectedNoCapacity`] and nothing is stored.
    ///
    /// `produce` runs with the cache locked. It must not touch this cache
    /// again (directly or through another thread it waits on), or it
    /// deadlocks.
    pub fn get_or_insert<F>(&self, key: K, produce: F) -> (V, Outcome)
    where
        F: FnOnce() -> V,
    {
        match self.try_get_or_insert(key, || Ok::<V, std::convert::Infallible>(produce())) {
            Ok(found) => found,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_insert`](Self::get_or_insert)
    ///
    /// A failing `produce` leaves the cache untouched; the error is handed
    /// back to the caller and nothing is remembered about it.
    pub fn try_get_or_insert<F, E>(&self, key: K, produce: F) -> std::result::Result<(V, Outcome), E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let mut lru = self.inner.lock();
        let full = lru.len() >= lru.capacity();

        let (value, outcome) = lru.try_get_or_insert_with(key, produce)?;
        self.stats.record_outcome(outcome);

        match outcome {
            Outcome::Hit => trace!("cache hit"),
            Outcome::Inserted if full => {
                self.stats.record_evictions(1);
                trace!(len = lru.len(), "evicted least recently used entry");
            }
            Outcome::Inserted => trace!(len = lru.len(), "cached new entry"),
            Outcome::RejectedNoCapacity => trace!("capacity is zero, value not cached"),
        }

        Ok((value, outcome))
    }

    /// Change the capacity
    ///
    /// Growing only raises the bound. Shrinking
    /// evicts least recently used entries until the cache fits. A negative
    /// capacity is rejected and leaves the cache unchanged.
    pub fn set_capacity(&self, capacity: i64) -> Result<()> {
        if capacity < 0 {
            return Err(Error::NegativeCapacity(capacity));
        }
        let capacity = usize::try_from(capacity).unwrap_or(usize::MAX);

        // Evicted entries are dropped after the lock is released
        let evicted = {
            let mut lru = self.inner.lock();
            let old = lru.capacity();
            let evicted = lru.set_capacity(capacity);
            debug!(old, new = capacity, evicted = evicted.len(), "cache resized");
            evicted
        };

        self.stats.record_evictions(evicted.len() as u64);
        Ok(())
    }

    /// Check whether a key is cached (no promotion)
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Get a cached value without promoting it
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    /// Remove a key, returning its value if it was cached
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Snapshot of the cached entries in unspecified order (no promotion)
    pub fn entries(&self) -> Vec<(K, V)> {
        self.inner
            .lock()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Cached keys from most to least recently used
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.inner
            .lock()
            .keys_by_recency()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Get the number of cached entries
    pub fn count(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get the current capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drop every entry and reset statistics (the capacity is kept)
    pub fn clear(&self) {
        self.inner.lock().clear();
        self.stats.reset();
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<K, V> fmt::Debug for BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lru = self.inner.lock();
        f.debug_struct("BoundedCache")
            .field("len", &lru.len())
            .field("capacity", &lru.capacity())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
