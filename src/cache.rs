//! # Cache — Bounded LRU for Repeated Primality Queries
//!
//! A fixed-capacity map from queried integer to its primality verdict with
//! least-recently-used eviction. Backed by a `HashMap` index into a slab of
//! intrusively linked nodes, so `get`, `insert`, and eviction are all O(1)
//! with no per-operation allocation once the slab is warm.
//!
//! The cache is a performance layer only: the engine produces identical
//! answers with the cache cleared, disabled, or thrashing. It tracks
//! hit/miss/eviction counters so benchmarking callers can verify cache-cold
//! versus cache-warm behavior.
//!
//! Not internally synchronized — the engine wraps it in a `Mutex` and holds
//! the lock only for the get or insert itself, never across a primality
//! computation.

use std::collections::HashMap;

use serde::Serialize;

/// Sentinel index for "no node".
const NIL: usize = usize::MAX;

/// Hit/miss/eviction counters, cumulative over the cache's lifetime
/// (surviving `clear`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

struct Node {
    key: u64,
    value: bool,
    prev: usize,
    next: usize,
}

/// Bounded LRU map from u64 to bool.
pub struct LruCache {
    map: HashMap<u64, usize>,
    nodes: Vec<Node>,
    free: Vec<usize>,
    /// Most recently used node, or NIL when empty.
    head: usize,
    /// Least recently used node, or NIL when empty.
    tail: usize,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl LruCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; the engine's config validation rejects
    /// that before construction.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LruCache capacity must be non-zero");
        LruCache {
            map: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: u64) -> Option<bool> {
        match self.map.get(&key).copied() {
            Some(idx) => {
                self.hits += 1;
                self.detach(idx);
                self.push_front(idx);
                Some(self.nodes[idx].value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert or refresh `key`, evicting the least recently used entry if
    /// the cache is full.
    pub fn insert(&mut self, key: u64, value: bool) {
        if let Some(idx) = self.map.get(&key).copied() {
            self.nodes[idx].value = value;
            self.detach(idx);
            self.push_front(idx);
            return;
        }

        if self.map.len() == self.capacity {
            self.evict_lru();
        }

        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Node {
                    key,
                    value,
                    prev: NIL,
                    next: NIL,
                };
                idx
            }
            None => {
                self.nodes.push(Node {
                    key,
                    value,
                    prev: NIL,
                    next: NIL,
                });
                self.nodes.len() - 1
            }
        };
        self.map.insert(key, idx);
        self.push_front(idx);
    }

    /// Drop every entry. Counters are cumulative and survive the clear.
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Counter snapshot plus current occupancy.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.map.len(),
            capacity: self.capacity,
        }
    }

    fn evict_lru(&mut self) {
        let idx = self.tail;
        debug_assert_ne!(idx, NIL, "evict on empty cache");
        self.detach(idx);
        self.map.remove(&self.nodes[idx].key);
        self.free.push(idx);
        self.evictions += 1;
    }

    /// Unlink a node from the recency list.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev != NIL {
            self.nodes[prev].next = next;
        } else if self.head == idx {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else if self.tail == idx {
            self.tail = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    /// Link a detached node at the head (most recently used).
    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_inserted_values() {
        let mut cache = LruCache::new(4);
        cache.insert(7, true);
        cache.insert(8, false);
        assert_eq!(cache.get(7), Some(true));
        assert_eq!(cache.get(8), Some(false));
        assert_eq!(cache.get(9), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn capacity_bound_is_respected() {
        let mut cache = LruCache::new(3);
        for k in 0..10 {
            cache.insert(k, true);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 7);
    }

    /// Filling past capacity evicts in insertion order when nothing was
    /// touched: the oldest key goes first.
    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LruCache::new(3);
        cache.insert(1, true);
        cache.insert(2, true);
        cache.insert(3, true);
        cache.insert(4, true); // evicts 1
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(2), Some(true));
    }

    /// A `get` refreshes recency: after touching the oldest entry, the
    /// next eviction takes the second-oldest instead.
    #[test]
    fn get_refreshes_recency() {
        let mut cache = LruCache::new(3);
        cache.insert(1, true);
        cache.insert(2, false);
        cache.insert(3, true);
        assert_eq!(cache.get(1), Some(true)); // 2 is now LRU
        cache.insert(4, true); // evicts 2
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.get(1), Some(true));
        assert_eq!(cache.get(3), Some(true));
        assert_eq!(cache.get(4), Some(true));
    }

    /// Re-inserting an existing key updates its value and recency without
    /// growing the cache.
    #[test]
    fn reinsert_updates_in_place() {
        let mut cache = LruCache::new(2);
        cache.insert(5, true);
        cache.insert(6, true);
        cache.insert(5, false);
        assert_eq!(cache.len(), 2);
        cache.insert(7, true); // evicts 6, not 5
        assert_eq!(cache.get(5), Some(false));
        assert_eq!(cache.get(6), None);
    }

    #[test]
    fn clear_empties_but_keeps_counters() {
        let mut cache = LruCache::new(4);
        cache.insert(1, true);
        assert_eq!(cache.get(1), Some(true));
        assert_eq!(cache.get(2), None);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(1), None);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2); // miss on 2, miss on 1 after clear
        assert_eq!(stats.len, 0);
    }

    #[test]
    fn capacity_one_churns_correctly() {
        let mut cache = LruCache::new(1);
        cache.insert(1, true);
        cache.insert(2, false);
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(2), Some(false));
        cache.insert(3, true);
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.get(3), Some(true));
        assert_eq!(cache.len(), 1);
    }

    /// Slab reuse after heavy churn: the node pool must not grow past
    /// capacity no matter how many insert/evict cycles run.
    #[test]
    fn slab_does_not_grow_past_capacity() {
        let mut cache = LruCache::new(8);
        for k in 0..1000u64 {
            cache.insert(k, k % 2 == 0);
        }
        assert_eq!(cache.len(), 8);
        assert!(cache.nodes.len() <= 8);
        // The eight most recent keys survive, in full
        for k in 992..1000u64 {
            assert_eq!(cache.get(k), Some(k % 2 == 0), "key {}", k);
        }
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_panics() {
        let _ = LruCache::new(0);
    }
}
