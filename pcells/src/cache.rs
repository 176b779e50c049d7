//! A bounded least-recently-used cache of generated cells.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

/// Hit and miss counters of a [`GenerationCache`].
#[derive(Debug, Default, Copy, Clone, Hash, Eq, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// A bounded map that evicts its least recently used entry.
///
/// Entries are kept in recency order: the front is the next to be evicted.
/// A capacity of zero disables caching.
#[derive(Debug, Clone)]
pub struct GenerationCache<K, V> {
    entries: IndexMap<K, V>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K: Hash + Eq, V> GenerationCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Looks up `key`, marking it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.entries.get_index_of(key) {
            Some(index) => {
                self.hits += 1;
                let last = self.entries.len() - 1;
                self.entries.move_index(index, last);
                self.entries.get_index(last).map(|(_, v)| v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts `value` as the most recently used entry, evicting as needed.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        self.entries.shift_remove(&key);
        while self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
            self.evictions += 1;
        }
        self.entries.insert(key, value);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = GenerationCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3);
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), ["a", "c"]);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.len, 2);
    }

    #[test]
    fn reinserting_refreshes_recency() {
        let mut cache = GenerationCache::new(2);
        cache.insert(1, "one");
        cache.insert(2, "two");
        cache.insert(1, "uno");
        cache.insert(3, "three");
        assert_eq!(cache.get(&1), Some(&"uno"));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = GenerationCache::new(0);
        cache.insert(1, 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }
}
