//! Cached folder maps, one per identifier collection.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use geoface_cache::keys;
use geoface_core::config::path::PathConfig;
use geoface_core::result::AppResult;
use geoface_core::traits::cache::CacheProvider;

use crate::grouping::{FolderGrouping, FolderMap};

/// Serialized form stored in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedFolderMap {
    built_at: DateTime<Utc>,
    map: FolderMap,
}

/// Grouped folder maps cached per collection.
///
/// Entries expire after the configured TTL; `refresh` and `evict` let the
/// caller drop an entry early, e.g. after uploading into a collection.
#[derive(Debug, Clone)]
pub struct FolderIndex {
    /// Backing cache.
    cache: Arc<dyn CacheProvider>,
    /// Lifetime of a cached map.
    ttl: Duration,
}

impl FolderIndex {
    /// Creates an index over `cache`.
    pub fn new(cache: Arc<dyn CacheProvider>, config: &PathConfig) -> Self {
        Self {
            cache,
            ttl: Duration::from_secs(config.index_ttl_seconds),
        }
    }

    /// Returns the folder map for `collection_id`, building it from `ids`
    /// when nothing usable is cached.
    pub async fn folders<I, S>(&self, collection_id: &str, ids: I) -> AppResult<FolderMap>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = keys::folder_index(collection_id);
        if let Some(raw) = self.cache.get(&key).await? {
            match serde_json::from_str::<CachedFolderMap>(&raw) {
                Ok(cached) => {
                    debug!(collection_id, built_at = %cached.built_at, "Folder index hit");
                    return Ok(cached.map);
                }
                Err(e) => {
                    warn!(collection_id, error = %e, "Discarding unreadable folder index entry");
                }
            }
        }
        self.refresh(collection_id, ids).await
    }

    /// Rebuilds and stores the folder map for `collection_id`.
    pub async fn refresh<I, S>(&self, collection_id: &str, ids: I) -> AppResult<FolderMap>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map = FolderGrouping::group_by_folder(ids);
        let entry = CachedFolderMap {
            built_at: Utc::now(),
            map,
        };
        let json = serde_json::to_string(&entry)?;
        self.cache
            .set(&keys::folder_index(collection_id), &json, self.ttl)
            .await?;

        info!(
            collection_id,
            folders = entry.map.len(),
            items = entry.map.total_items(),
            skipped = entry.map.skipped,
            "Folder index rebuilt"
        );
        Ok(entry.map)
    }

    /// Drops the cached map of one collection.
    pub async fn evict(&self, collection_id: &str) -> AppResult<()> {
        self.cache.delete(&keys::folder_index(collection_id)).await
    }

    /// Drops every cached folder map. Returns the number removed.
    pub async fn evict_all(&self) -> AppResult<u64> {
        self.cache.delete_pattern(&keys::folder_index_pattern()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoface_cache::memory::MemoryCacheProvider;
    use geoface_core::config::cache::MemoryCacheConfig;

    fn make_index() -> (FolderIndex, Arc<MemoryCacheProvider>) {
        let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default(), 60));
        let index = FolderIndex::new(cache.clone(), &PathConfig::default());
        (index, cache)
    }

    #[tokio::test]
    async fn test_cached_map_is_reused() {
        let (index, _) = make_index();
        let first = index.folders("c1", ["A:B:f1.jpg"]).await.unwrap();
        // A different id list is ignored while the entry is cached.
        let second = index.folders("c1", ["Z:f9.jpg"]).await.unwrap();
        assert_eq!(first, second);
        assert!(second.get("A:B").is_some());
    }

    #[tokio::test]
    async fn test_refresh_replaces_entry() {
        let (index, _) = make_index();
        index.folders("c1", ["A:B:f1.jpg"]).await.unwrap();
        let refreshed = index.refresh("c1", ["Z:f9.jpg"]).await.unwrap();
        assert!(refreshed.get("Z").is_some());
        let again = index.folders("c1", Vec::<String>::new()).await.unwrap();
        assert!(again.get("A:B").is_none());
    }

    #[tokio::test]
    async fn test_evict() {
        let (index, cache) = make_index();
        index.folders("c1", ["A:f.jpg"]).await.unwrap();
        index.folders("c2", ["B:f.jpg"]).await.unwrap();

        index.evict("c1").await.unwrap();
        assert!(!cache.exists(&keys::folder_index("c1")).await.unwrap());
        assert!(cache.exists(&keys::folder_index("c2")).await.unwrap());

        index.evict_all().await.unwrap();
        assert!(!cache.exists(&keys::folder_index("c2")).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_entry_rebuilt() {
        let (index, cache) = make_index();
        cache
            .set(&keys::folder_index("c1"), "not json", Duration::from_secs(60))
            .await
            .unwrap();
        let map = index.folders("c1", ["A:f.jpg"]).await.unwrap();
        assert_eq!(map.total_items(), 1);
    }
}
