//! Short-TTL read-through cache for expensive aggregate queries.
//!
//! Values are stored serialized so one cache serves heterogeneous result
//! types. Staleness is bounded by the TTL; the transition engine shrinks the
//! window further by invalidating affected namespaces immediately after each
//! commit. The cache itself is the only component safely read without
//! transactional protection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Cache key namespaces, one per invalidation domain. Keys are formed as
/// `"{namespace}{suffix}"` so `invalidate(namespace)` clears the domain.
pub mod namespaces {
    pub const ANIMALS: &str = "animals:";
    pub const RESCUES: &str = "rescues:";
    pub const ADOPTIONS: &str = "adoptions:";
    pub const DASHBOARD: &str = "dashboard:";
}

/// Default TTL for cached aggregates.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Thread-safe in-process cache with per-entry TTL and prefix invalidation.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl QueryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Fetch a cached value. Expired entries count as misses and are evicted
    /// lazily.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        {
            let map = self.inner.read();
            let entry = map.get(key)?;
            if entry.expires_at > Instant::now() {
                return serde_json::from_value(entry.value.clone()).ok();
            }
        }
        self.inner.write().remove(key);
        None
    }

    /// Store a value under `key`. Serialization failures are logged and the
    /// entry is skipped; the cache never makes a read path fail.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        match serde_json::to_value(value) {
            Ok(serialized) => {
                let entry = CacheEntry {
                    value: serialized,
                    expires_at: Instant::now() + ttl.unwrap_or(self.default_ttl),
                };
                self.inner.write().insert(key.to_string(), entry);
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to serialize cache entry");
            }
        }
    }

    /// Read-through: return the cached value or compute, cache, and return.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            return Ok(hit);
        }
        let value = compute().await?;
        self.put(key, &value, ttl);
        Ok(value)
    }

    /// Drop every key under a logical namespace. Returns the number of
    /// entries removed.
    pub fn invalidate(&self, prefix: &str) -> usize {
        let mut map = self.inner.write();
        let before = map.len();
        map.retain(|key, _| !key.starts_with(prefix));
        before - map.len()
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_values() {
        let cache = QueryCache::default();
        cache.put("animals:adoptable", &vec![1i64, 2, 3], None);
        assert_eq!(
            cache.get::<Vec<i64>>("animals:adoptable"),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn expired_entries_are_misses() {
        let cache = QueryCache::new(Duration::from_millis(0));
        cache.put("dashboard:counts", &42i64, Some(Duration::from_millis(0)));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get::<i64>("dashboard:counts"), None);
        assert!(cache.is_empty(), "expired entry is evicted on read");
    }

    #[test]
    fn prefix_invalidation_spares_other_namespaces() {
        let cache = QueryCache::default();
        cache.put("animals:adoptable", &1i64, None);
        cache.put("animals:all", &2i64, None);
        cache.put("dashboard:counts", &3i64, None);

        let removed = cache.invalidate(namespaces::ANIMALS);
        assert_eq!(removed, 2);
        assert_eq!(cache.get::<i64>("animals:adoptable"), None);
        assert_eq!(cache.get::<i64>("dashboard:counts"), Some(3));
    }

    #[tokio::test]
    async fn get_or_compute_caches_first_result() {
        let cache = QueryCache::default();
        let mut calls = 0u32;

        for _ in 0..3 {
            let value: Result<i64, std::convert::Infallible> = cache
                .get_or_compute("dashboard:counts", None, || {
                    calls += 1;
                    async { Ok(7) }
                })
                .await;
            assert_eq!(value.unwrap(), 7);
        }
        assert_eq!(calls, 1, "compute runs once within the TTL window");
    }
}
