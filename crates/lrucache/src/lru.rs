//! LRU (Least Recently Used) cache implementation
//!
//! Uses an intrusive doubly-linked list threaded through a slab of nodes,
//! indexed by key. Promotion, insertion and eviction are all O(1). Nodes
//! never move inside the slab, so the key index cannot drift out of sync
//! with the recency order.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

/// Most slots reserved ahead of use when creating or growing a cache
const PRESIZE_LIMIT: usize = 1024;

/// Result of a lookup-or-insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The key was cached; its value was returned and promoted
    Hit,
    /// The key was missing; a fresh value was produced and cached as most recent
    Inserted,
    /// The key was missing and the capacity is zero; the fresh value was not cached
    RejectedNoCapacity,
}

impl Outcome {
    /// Whether the value came out of the cache
    pub fn is_hit(self) -> bool {
        matches!(self, Outcome::Hit)
    }
}

/// Node in the LRU doubly-linked list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU cache with a resizable capacity
///
/// `head` is the most recently touched entry, `tail` the least recently
/// touched one. A capacity of zero is legal: nothing is ever stored.
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity.min(PRESIZE_LIMIT), RandomState::new()),
            nodes: Vec::with_capacity(capacity.min(PRESIZE_LIMIT)),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Get a value from the cache, promoting it to most recent
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Get a value without touching the recency order
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Check whether a key is cached, without touching the recency order
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Return the cached value for `key`, or produce, cache and return a new one
    ///
    /// `produce` runs at most once and never on a hit.
    pub fn get_or_insert_with<F>(&mut self, key: K, produce: F) -> (V, Outcome)
    where
        V: Clone,
        F: FnOnce() -> V,
    {
        match self.try_get_or_insert_with(key, || Ok::<V, std::convert::Infallible>(produce())) {
            Ok(found) => found,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with)
    ///
    /// If `produce` fails the error is returned and the cache is left
    /// exactly as it was: no entry is stored and nothing is evicted.
    pub fn try_get_or_insert_with<F, E>(&mut self, key: K, produce: F) -> Result<(V, Outcome), E>
    where
        V: Clone,
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok((value.clone(), Outcome::Hit));
        }

        let value = produce()?;

        if self.capacity == 0 {
            return Ok((value, Outcome::RejectedNoCapacity));
        }

        self.insert_new(key, value.clone());
        Ok((value, Outcome::Inserted))
    }

    /// Insert a key-value pair into the cache
    ///
    /// An existing key has its value replaced and is promoted. Returns the
    /// entry pushed out by this call: the evicted least recent entry, or the
    /// given pair itself when the capacity is zero.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(node) = &mut self.nodes[idx] {
                node.value = value;
            }
            self.move_to_front(idx);
            return None;
        }

        if self.capacity == 0 {
            return Some((key, value));
        }

        self.insert_new(key, value)
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.free_node(idx);
        self.nodes[idx].take().map(|node| node.value)
    }

    /// Remove and return the least recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.map.remove(&node.key);
        self.free_node(idx);
        Some((node.key, node.value))
    }

    /// Change the capacity
    ///
    /// Growing never evicts. Room is reserved ahead for at most
    /// `PRESIZE_LIMIT` more entries, so huge bounds cost nothing up front.
    /// Shrinking evicts least recently used entries until the cache fits.
    /// Returns the evicted entries, oldest first.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<(K, V)> {
        let mut evicted = Vec::new();

        if capacity > self.capacity {
            let additional = (capacity - self.map.len()).min(PRESIZE_LIMIT);
            self.map.reserve(additional);
            self.nodes.reserve(additional);
        } else {
            while self.map.len() > capacity {
                match self.pop_lru() {
                    Some(entry) => evicted.push(entry),
                    None => break,
                }
            }
            if self.map.is_empty() {
                self.nodes.clear();
                self.free_list.clear();
            }
        }

        self.capacity = capacity;
        evicted
    }

    /// Keys from most to least recently used
    pub fn keys_by_recency(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match &self.nodes[idx] {
                Some(node) => {
                    keys.push(&node.key);
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }

    /// Iterate over cached entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.nodes
            .iter()
            .filter_map(|slot| slot.as_ref().map(|node| (&node.key, &node.value)))
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache (the capacity is kept)
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    /// Insert a key known to be absent; capacity must be non-zero
    fn insert_new(&mut self, key: K, value: V) -> Option<(K, V)> {
        let evicted = if self.map.len() >= self.capacity {
            self.pop_lru()
        } else {
            None
        };

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_front(idx);
        self.map.insert(key, idx);

        evicted
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already at front
        }

        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = old_head;
        }

        if let Some(head_idx) = old_head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = None;
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }
}
