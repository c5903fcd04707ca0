use std::collections::HashMap;
use std::hash::Hash;

/// Entries a cache holds before the oldest one is evicted.
pub const MAX_CACHED_QUERIES: usize = 32;

/// Time-to-live cache for completed query results.
///
/// Time is passed in by the caller as milliseconds so the cache itself never
/// reads a clock. Inserting drops expired entries and, at capacity, the oldest
/// one.
#[derive(Debug, Clone)]
pub struct QueryCache<K, V> {
    ttl_ms: u64,
    max_entries: usize,
    entries: HashMap<K, CacheEntry<V>>,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at_ms: u64,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) < ttl_ms
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(ttl_ms: u64) -> Self {
        Self::with_capacity(ttl_ms, MAX_CACHED_QUERIES)
    }

    pub fn with_capacity(ttl_ms: u64, max_entries: usize) -> Self {
        Self {
            ttl_ms,
            max_entries: max_entries.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Fresh value for `key`, if any. Expired entries are left for `prune_expired`.
    pub fn get(&self, key: &K, now_ms: u64) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now_ms, self.ttl_ms))
            .map(|entry| &entry.value)
    }

    pub fn insert(&mut self, key: K, value: V, now_ms: u64) {
        self.prune_expired(now_ms);
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at_ms)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at_ms: now_ms,
            },
        );
    }

    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops expired entries, returning how many were removed.
    pub fn prune_expired(&mut self, now_ms: u64) -> usize {
        let ttl_ms = self.ttl_ms;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now_ms, ttl_ms));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_expires_after_ttl() {
        let mut cache = QueryCache::new(1_000);
        cache.insert("regions", 3, 10_000);
        assert_eq!(cache.get(&"regions", 10_999), Some(&3));
        assert_eq!(cache.get(&"regions", 11_000), None);
    }

    #[test]
    fn invalidate_removes_single_key() {
        let mut cache = QueryCache::new(60_000);
        cache.insert("a", 1, 0);
        cache.insert("b", 2, 0);
        assert!(cache.invalidate(&"a"));
        assert!(!cache.invalidate(&"a"));
        assert_eq!(cache.get(&"a", 1), None);
        assert_eq!(cache.get(&"b", 1), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn prune_drops_only_expired_entries() {
        let mut cache = QueryCache::new(100);
        cache.insert("old", (), 0);
        cache.insert("new", (), 90);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.prune_expired(150), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&"new", 150).is_some());
    }

    #[test]
    fn insert_drops_entries_past_their_ttl() {
        let mut cache = QueryCache::new(300);
        for n in 0..100u64 {
            cache.insert(n, n, n * 10);
        }
        // Only the last 30 inserts are younger than 300 ms.
        assert_eq!(cache.len(), 30);
        assert_eq!(cache.get(&99, 990), Some(&99));
        assert_eq!(cache.get(&0, 990), None);
    }

    #[test]
    fn full_cache_evicts_the_oldest_entry() {
        let mut cache = QueryCache::with_capacity(60_000, 2);
        cache.insert("a", 1, 0);
        cache.insert("b", 2, 10);
        cache.insert("a", 3, 20);
        assert_eq!(cache.len(), 2);

        cache.insert("c", 4, 30);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"b", 30), None);
        assert_eq!(cache.get(&"a", 30), Some(&3));
        assert_eq!(cache.get(&"c", 30), Some(&4));
    }

    #[test]
    fn clock_going_backwards_keeps_entry_fresh() {
        let mut cache = QueryCache::new(100);
        cache.insert("k", 1, 500);
        assert_eq!(cache.get(&"k", 400), Some(&1));
    }
}
