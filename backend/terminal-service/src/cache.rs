//! In-process TTL cache
//!
//! Entries expire after a fixed lifetime; there is no size-based eviction.
//! Expired entries are dropped lazily on read and by a periodic purge task.
//!
//! Used for listing pages (invalidated by key prefix on writes) and for
//! OAuth `state` values (consumed once with [`TtlCache::take`]).

use dashmap::DashMap;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

lazy_static! {
    static ref CACHE_LOOKUPS: IntCounterVec = register_int_counter_vec!(
        "terminal_cache_lookups_total",
        "TTL cache lookups by cache name and result",
        &["cache", "result"]
    )
    .expect("Failed to register terminal_cache_lookups_total");
}

#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CachedEntry<V> {
    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct TtlCache<V> {
    name: &'static str,
    store: DashMap<String, CachedEntry<V>>,
    ttl: Duration,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            store: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let lookup = self
            .store
            .get(key)
            .map(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));

        let hit = match lookup {
            Some(Some(value)) => Some(value),
            Some(None) => {
                self.store.remove_if(key, |_, e| e.is_expired(now));
                None
            }
            None => None,
        };

        let result = if hit.is_some() { "hit" } else { "miss" };
        CACHE_LOOKUPS.with_label_values(&[self.name, result]).inc();
        hit
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.insert_with_ttl(key, value, self.ttl);
    }

    pub fn insert_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.store.insert(
            key.into(),
            CachedEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Remove and return a live entry; each key can be taken once
    pub fn take(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.store
            .remove(key)
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(_, entry)| entry.value)
    }

    /// Drop every entry whose key starts with `prefix`
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let before = self.store.len();
        self.store.retain(|key, _| !key.starts_with(prefix));
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            tracing::debug!(cache = self.name, prefix, removed, "Cache entries invalidated");
        }
        removed
    }

    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.store.len())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Spawn a task purging expired entries every `period`
    pub fn spawn_purge_task(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let purged = cache.purge_expired();
                if purged > 0 {
                    tracing::debug!(cache = cache.name, purged, "Expired cache entries purged");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_expiry() {
        let cache = TtlCache::new("test", Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert_with_ttl("b", 2, Duration::ZERO);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_take_consumes_once() {
        let cache = TtlCache::new("test", Duration::from_secs(60));
        cache.insert("state", "google".to_string());
        assert_eq!(cache.take("state").as_deref(), Some("google"));
        assert_eq!(cache.take("state"), None);
    }

    #[test]
    fn test_invalidate_prefix() {
        let cache = TtlCache::new("test", Duration::from_secs(60));
        cache.insert("news:1", 1);
        cache.insert("news:2", 2);
        cache.insert("blogs:1", 3);

        assert_eq!(cache.invalidate_prefix("news:"), 2);
        assert_eq!(cache.get("blogs:1"), Some(3));
    }

    #[test]
    fn test_purge_expired() {
        let cache = TtlCache::new("test", Duration::ZERO);
        cache.insert("x", 1);
        cache.insert("y", 2);
        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.is_empty());
    }
}
