//! Property-Based Tests for the cache engine
//!
//! Uses proptest to check the engine against a naive recency model.

use proptest::prelude::*;

use crate::{BoundedCache, Outcome};

// == Model ==
/// Reference LRU: a vector ordered most recent first.
#[derive(Debug, Default)]
struct Model {
    entries: Vec<(u8, u32)>,
    capacity: usize,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        let entry = self.entries.remove(pos);
        self.entries.insert(0, entry);
        Some(entry.1)
    }

    fn get_or_insert(&mut self, key: u8, value: u32) -> (u32, Outcome) {
        if let Some(found) = self.get(key) {
            return (found, Outcome::Hit);
        }
        if self.capacity == 0 {
            return (value, Outcome::RejectedNoCapacity);
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop();
        }
        self.entries.insert(0, (key, value));
        (value, Outcome::Inserted)
    }

    fn remove(&mut self, key: u8) -> Option<u32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }

    fn set_capacity(&mut self, capacity: usize) {
        self.entries.truncate(capacity);
        self.capacity = capacity;
    }

    fn keys(&self) -> Vec<u8> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }
}

// == Strategies ==
#[derive(Debug, Clone)]
enum CacheOp {
    Get(u8),
    GetOrInsert(u8, u32),
    Remove(u8),
    SetCapacity(usize),
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (0u8..16).prop_map(CacheOp::Get),
        6 => (0u8..16, any::<u32>()).prop_map(|(k, v)| CacheOp::GetOrInsert(k, v)),
        1 => (0u8..16).prop_map(CacheOp::Remove),
        1 => (0usize..10).prop_map(CacheOp::SetCapacity),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations the engine agrees with the model on
    // every returned value, outcome and the full recency order, and never
    // holds more entries than its capacity.
    #[test]
    fn prop_matches_recency_model(
        capacity in 0usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120),
    ) {
        let cache = BoundedCache::new(capacity);
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                CacheOp::Get(k) => {
                    prop_assert_eq!(cache.get(&k), model.get(k));
                }
                CacheOp::GetOrInsert(k, v) => {
                    prop_assert_eq!(cache.get_or_insert(k, || v), model.get_or_insert(k, v));
                }
                CacheOp::Remove(k) => {
                    prop_assert_eq!(cache.remove(&k), model.remove(k));
                }
                CacheOp::SetCapacity(c) => {
                    cache.set_capacity(c as i64).unwrap();
                    model.set_capacity(c);
                }
            }

            prop_assert!(cache.count() <= cache.capacity());
            prop_assert_eq!(cache.keys_by_recency(), model.keys());
        }
    }

    // Inserting k1..kn without hits, then shrinking to m, keeps exactly the
    // newest m keys.
    #[test]
    fn prop_shrink_keeps_newest(n in 1usize..40, m_seed in any::<usize>()) {
        let m = m_seed % n;
        let cache = BoundedCache::new(n);
        for k in 0..n {
            cache.get_or_insert(k, || k);
        }

        cache.set_capacity(m as i64).unwrap();

        let mut kept: Vec<usize> = cache.entries().into_iter().map(|(k, _)| k).collect();
        kept.sort_unstable();
        prop_assert_eq!(kept, ((n - m)..n).collect::<Vec<_>>());
    }

    // A key touched after all others survives a shrink to one.
    #[test]
    fn prop_hit_promotes(n in 2usize..20, touched_seed in any::<usize>()) {
        let touched = touched_seed % n;
        let cache = BoundedCache::new(n);
        for k in 0..n {
            cache.get_or_insert(k, || k);
        }

        prop_assert_eq!(cache.get(&touched), Some(touched));
        cache.set_capacity(1).unwrap();
        prop_assert_eq!(cache.entries(), vec![(touched, touched)]);
    }

    // With zero capacity nothing is ever stored, whatever came before.
    #[test]
    fn prop_zero_capacity_rejects(
        history in prop::collection::vec(0u8..16, 0..20),
        probes in prop::collection::vec(0u8..16, 1..20),
    ) {
        let cache = BoundedCache::new(4);
        for k in history {
            cache.get_or_insert(k, || u32::from(k));
        }
        cache.set_capacity(0).unwrap();

        for k in probes {
            let (_, outcome) = cache.get_or_insert(k, || 0);
            prop_assert_eq!(outcome, Outcome::RejectedNoCapacity);
            prop_assert_eq!(cache.count(), 0);
        }
    }

    // Setting the same capacity twice changes nothing.
    #[test]
    fn prop_repeated_resize_is_idempotent(
        keys in prop::collection::vec(0u8..32, 0..40),
        capacity in 0usize..16,
    ) {
        let cache = BoundedCache::new(8);
        for k in keys {
            cache.get_or_insert(k, || u32::from(k) * 3);
        }

        cache.set_capacity(capacity as i64).unwrap();
        let before = cache.keys_by_recency();
        cache.set_capacity(capacity as i64).unwrap();

        prop_assert_eq!(cache.keys_by_recency(), before);
    }
}
