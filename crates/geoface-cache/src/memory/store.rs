//! In-memory cache implementation using the moka crate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tracing::debug;

use geoface_core::config::cache::MemoryCacheConfig;
use geoface_core::result::AppResult;
use geoface_core::traits::cache::CacheProvider;

/// In-memory cache provider using moka.
///
/// moka enforces the capacity bound and a cache-wide upper TTL; the
/// per-entry TTL requested by callers is tracked as a deadline and checked
/// on read.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, String>,
    /// Default TTL for entries.
    default_ttl: Duration,
    /// Key → instant after which the entry is treated as absent.
    deadlines: Arc<DashMap<String, Instant>>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig, default_ttl_seconds: u64) -> Self {
        let deadlines: Arc<DashMap<String, Instant>> = Arc::new(DashMap::new());

        // Entries moka drops on its own take their deadline with them.
        let evicted = Arc::clone(&deadlines);
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .eviction_listener(move |key: Arc<String>, _value, cause: RemovalCause| {
                if cause.was_evicted() {
                    evicted.remove(key.as_str());
                }
            })
            .build();

        Self {
            cache,
            default_ttl: Duration::from_secs(default_ttl_seconds),
            deadlines,
        }
    }

    fn is_expired(&self, key: &str) -> bool {
        self.deadlines
            .get(key)
            .is_some_and(|deadline| Instant::now() >= *deadline)
    }

    async fn remove(&self, key: &str) {
        self.cache.remove(key).await;
        self.deadlines.remove(key);
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        if self.is_expired(key) {
            self.remove(key).await;
            return Ok(None);
        }
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.deadlines.insert(key.to_string(), Instant::now() + ttl);
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.remove(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        if self.is_expired(key) {
            self.remove(key).await;
            return Ok(false);
        }
        Ok(self.cache.contains_key(key))
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        // Only trailing-wildcard patterns are supported; moka has no scan.
        let prefix = pattern.trim_end_matches('*');

        let keys_to_remove: Vec<String> = self
            .cache
            .iter()
            .filter(|entry| entry.0.starts_with(prefix))
            .map(|entry| entry.0.to_string())
            .collect();

        let mut count = 0u64;
        for key in keys_to_remove {
            self.remove(&key).await;
            count += 1;
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoface_core::config::cache::MemoryCacheConfig;

    fn make_provider() -> MemoryCacheProvider {
        let config = MemoryCacheConfig {
            max_capacity: 1000,
            time_to_live_seconds: 60,
        };
        MemoryCacheProvider::new(&config, 60)
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider
            .set("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        provider.delete("key2").await.unwrap();
        let val = provider.get("key2").await.unwrap();
        assert_eq!(val, None);
    }

    #[tokio::test]
    async fn test_entry_deadline() {
        let provider = make_provider();
        provider.set("short", "v", Duration::ZERO).await.unwrap();
        assert_eq!(provider.get("short").await.unwrap(), None);
        assert!(!provider.exists("short").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_pattern() {
        let provider = make_provider();
        provider.set_default("geoface:children:PNG:a", "1").await.unwrap();
        provider.set_default("geoface:children:PNG:b", "2").await.unwrap();
        provider.set_default("geoface:children:ABG:a", "3").await.unwrap();
        provider.cache.run_pending_tasks().await;

        let removed = provider
            .delete_pattern("geoface:children:PNG:*")
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(provider.exists("geoface:children:ABG:a").await.unwrap());
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let provider = make_provider();
        let data = serde_json::json!({"name": "test", "count": 42});
        provider
            .set_json("json_key", &data, Duration::from_secs(60))
            .await
            .unwrap();
        let result: Option<serde_json::Value> = provider.get_json("json_key").await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_capacity_eviction_drops_deadlines() {
        let config = MemoryCacheConfig {
            max_capacity: 1,
            time_to_live_seconds: 60,
        };
        let provider = MemoryCacheProvider::new(&config, 60);
        for key in ["a", "b", "c", "d"] {
            provider.set_default(key, "v").await.unwrap();
            provider.cache.run_pending_tasks().await;
        }

        assert_eq!(provider.cache.entry_count(), 1);
        assert_eq!(provider.deadlines.len(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_deadline() {
        let provider = make_provider();
        provider.set_default("key", "v1").await.unwrap();
        provider.set_default("key", "v2").await.unwrap();
        provider.cache.run_pending_tasks().await;

        assert!(provider.deadlines.contains_key("key"));
        assert_eq!(provider.get("key").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_health_check() {
        let provider = make_provider();
        assert!(provider.health_check().await.unwrap());
    }
}
