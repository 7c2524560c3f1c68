//! In-memory TTL implementation of [`SearchCache`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use crate::config::CacheConfig;
use crate::platform::SearchHit;

use super::{SearchCache, SearchCacheKey, SearchCacheStats};

/// Process-local search cache backed by `moka`.
///
/// Entries live for `ttl` after insertion. Once `max_entries` is reached,
/// moka's admission policy decides which entries to evict.
pub struct InMemorySearchCache {
    cache: Cache<SearchCacheKey, Vec<SearchHit>>,
    ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemorySearchCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        let cache = Cache::builder()
            .max_capacity(max_entries as u64)
            .time_to_live(ttl)
            .build();

        Self {
            cache,
            ttl,
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
    }
}

impl SearchCache for InMemorySearchCache {
    fn get(&self, key: &SearchCacheKey) -> Option<Vec<SearchHit>> {
        match self.cache.get(key) {
            Some(hits) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(hits)
            }
            None => {
                debug!(keyword = %key.keyword, "Search cache miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn put(&self, key: SearchCacheKey, hits: Vec<SearchHit>) {
        self.cache.insert(key, hits);
    }

    fn stats(&self) -> SearchCacheStats {
        // entry_count lags behind until pending evictions are applied
        self.cache.run_pending_tasks();
        SearchCacheStats {
            entries: self.cache.entry_count() as usize,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ttl_secs: self.ttl.as_secs(),
            max_entries: self.max_entries,
        }
    }

    fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn key(keyword: &str) -> SearchCacheKey {
        SearchCacheKey::new(keyword, "2025-11-20T08:15:00Z")
    }

    #[test]
    fn test_put_then_get() {
        let cache = InMemorySearchCache::new(Duration::from_secs(60), 10);
        let hits = vec![fixtures::search_hit("v1", "c1", 3)];

        assert!(cache.get(&key("aita")).is_none());
        cache.put(key("aita"), hits.clone());
        assert_eq!(cache.get(&key("aita")), Some(hits));

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_key_includes_window() {
        let cache = InMemorySearchCache::new(Duration::from_secs(60), 10);
        cache.put(key("aita"), vec![fixtures::search_hit("v1", "c1", 3)]);

        let other_window = SearchCacheKey::new("aita", "2025-11-21T08:15:00Z");
        assert!(cache.get(&other_window).is_none());
    }

    #[test]
    fn test_entries_expire() {
        let cache = InMemorySearchCache::new(Duration::from_millis(20), 10);
        cache.put(key("aita"), vec![fixtures::search_hit("v1", "c1", 3)]);

        std::thread::sleep(Duration::from_millis(60));

        assert!(cache.get(&key("aita")).is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let cache = InMemorySearchCache::new(Duration::from_secs(60), 2);
        for keyword in ["first", "second", "third", "fourth"] {
            cache.put(key(keyword), vec![]);
        }

        let stats = cache.stats();
        assert!(stats.entries <= 2, "entries = {}", stats.entries);
        assert_eq!(stats.max_entries, 2);
    }

    #[test]
    fn test_replacing_existing_key() {
        let cache = InMemorySearchCache::new(Duration::from_secs(60), 2);
        cache.put(key("first"), vec![]);
        cache.put(key("first"), vec![fixtures::search_hit("v1", "c1", 1)]);

        assert_eq!(cache.get(&key("first")).unwrap().len(), 1);
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_clear() {
        let cache = InMemorySearchCache::from_config(&CacheConfig::default());
        cache.put(key("aita"), vec![]);
        cache.clear();
        assert!(cache.get(&key("aita")).is_none());

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.ttl_secs, 3600);
    }
}
