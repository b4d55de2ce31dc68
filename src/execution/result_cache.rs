use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{config::EvaluationConfig, execution::QueryResult, normalizer::normalize_for_comparison};

struct CacheEntry {
    result: Arc<QueryResult>,
    inserted_at: Instant,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl: Duration,
}

/// Successful query results keyed by the hash of their normalized text.
///
/// Entries expire `ttl` after insertion, checked when looked up. When full,
/// an insert evicts the oldest inserted entry. Two callers missing on the
/// same key both execute; the later insert wins.
pub struct ResultCache {
    entries: Mutex<IndexMap<String, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            capacity,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &EvaluationConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_ttl)
    }

    pub fn key(sql: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalize_for_comparison(sql).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn get(&self, sql: &str) -> Option<Arc<QueryResult>> {
        self.get_at(sql, Instant::now())
    }

    pub(crate) fn get_at(&self, sql: &str, now: Instant) -> Option<Arc<QueryResult>> {
        let key = Self::key(sql);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let expired = match entries.get(&key) {
            Some(entry) if now.saturating_duration_since(entry.inserted_at) < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.result.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.shift_remove(&key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, sql: &str, result: QueryResult) -> Arc<QueryResult> {
        self.insert_at(sql, result, Instant::now())
    }

    pub(crate) fn insert_at(&self, sql: &str, result: QueryResult, now: Instant) -> Arc<QueryResult> {
        let result = Arc::new(result);
        if self.capacity == 0 {
            return result;
        }

        let key = Self::key(sql);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.shift_remove(&key);
        while entries.len() >= self.capacity {
            entries.shift_remove_index(0);
        }
        entries.insert(key, CacheEntry { result: result.clone(), inserted_at: now });

        result
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            size: self.len(),
            capacity: self.capacity,
            hits,
            misses,
            hit_rate: if total > 0 { hits as f64 / total as f64 } else { 0.0 },
            ttl: self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use serde_json::json;

    use crate::execution::{QueryResult, ResultCache};

    fn result(value: i64) -> QueryResult {
        QueryResult::new(&["n"], vec![vec![json!(value)]])
    }

    #[test]
    pub fn test_lookup_ignores_case_and_whitespace() {
        let cache = ResultCache::new(10, Duration::from_secs(60));
        cache.insert("select count(*) from patients;", result(3));

        let hit = cache.get("SELECT  COUNT(*)\n FROM PATIENTS").expect("Expected a cache hit");
        assert_eq!(hit.rows, vec![vec![json!(3)]]);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    pub fn test_distinct_literals_do_not_share_entries() {
        let cache = ResultCache::new(10, Duration::from_secs(60));
        cache.insert("SELECT a FROM t WHERE b = 'x;y'", result(1));

        assert!(cache.get("SELECT a FROM t WHERE b = 'x y'").is_none());
        assert_ne!(
            ResultCache::key("SELECT a FROM t WHERE b = 'x;y'"),
            ResultCache::key("SELECT a FROM t WHERE b = 'x y'")
        );
    }

    #[test]
    pub fn test_entries_expire_after_ttl() {
        let ttl = Duration::from_secs(60);
        let cache = ResultCache::new(10, ttl);
        let start = Instant::now();
        cache.insert_at("SELECT 1 FROM dual", result(1), start);

        assert!(cache.get_at("SELECT 1 FROM dual", start + ttl - Duration::from_millis(1)).is_some());
        assert!(cache.get_at("SELECT 1 FROM dual", start + ttl).is_none());
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    pub fn test_oldest_entry_is_evicted() {
        let cache = ResultCache::new(2, Duration::from_secs(60));
        cache.insert("SELECT a FROM t", result(1));
        cache.insert("SELECT b FROM t", result(2));
        cache.insert("SELECT c FROM t", result(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("SELECT a FROM t").is_none());
        assert!(cache.get("SELECT b FROM t").is_some());
        assert!(cache.get("SELECT c FROM t").is_some());
    }

    #[test]
    pub fn test_reinsert_refreshes_position() {
        let cache = ResultCache::new(2, Duration::from_secs(60));
        cache.insert("SELECT a FROM t", result(1));
        cache.insert("SELECT b FROM t", result(2));
        cache.insert("SELECT a FROM t", result(10));
        cache.insert("SELECT c FROM t", result(3));

        assert!(cache.get("SELECT b FROM t").is_none());
        let a = cache.get("SELECT a FROM t").expect("Expected a cache hit");
        assert_eq!(a.rows, vec![vec![json!(10)]]);
    }

    #[test]
    pub fn test_clear_resets_counters() {
        let cache = ResultCache::new(2, Duration::from_secs(60));
        cache.insert("SELECT a FROM t", result(1));
        let _ = cache.get("SELECT a FROM t");
        cache.clear();

        let stats = cache.stats();
        assert_eq!((stats.size, stats.hits, stats.misses), (0, 0, 0));
        assert_eq!(stats.capacity, 2);
    }

    #[test]
    pub fn test_zero_capacity_stores_nothing() {
        let cache = ResultCache::new(0, Duration::from_secs(60));
        cache.insert("SELECT a FROM t", result(1));
        assert!(cache.is_empty());
    }
}
