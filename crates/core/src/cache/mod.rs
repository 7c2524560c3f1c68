//! Search cache - memoizes keyword searches for a bounded time.
//!
//! A repeated hunt over the same keywords and window would otherwise spend
//! the expensive search quota again. Only the search stage is cached;
//! statistics are always fetched fresh.

mod memory;

pub use memory::InMemorySearchCache;

use serde::{Deserialize, Serialize};

use crate::platform::SearchHit;

/// Cache key: the exact keyword and `publishedAfter` instant of a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCacheKey {
    pub keyword: String,
    pub published_after: String,
}

impl SearchCacheKey {
    pub fn new(keyword: impl Into<String>, published_after: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            published_after: published_after.into(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchCacheStats {
    /// Entries that have not expired.
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub ttl_secs: u64,
    pub max_entries: usize,
}

/// Trait for search cache storage.
pub trait SearchCache: Send + Sync {
    /// Return cached hits for `key` if present and not expired.
    fn get(&self, key: &SearchCacheKey) -> Option<Vec<SearchHit>>;

    /// Store hits for `key`, replacing any previous entry.
    fn put(&self, key: SearchCacheKey, hits: Vec<SearchHit>);

    /// Get cache statistics.
    fn stats(&self) -> SearchCacheStats;

    /// Clear all cached data.
    fn clear(&self);
}
