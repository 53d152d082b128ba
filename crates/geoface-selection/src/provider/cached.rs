//! Read-through cache in front of another hierarchy provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use geoface_cache::keys;
use geoface_core::result::AppResult;
use geoface_core::traits::cache::CacheProvider;
use geoface_core::traits::hierarchy::HierarchyProvider;
use geoface_core::types::hierarchy::{ChildrenPage, ChildrenRequest};

/// Caches children pages of `P` under `(mode, level, parent)`.
///
/// Cache failures are logged and the request falls through to the inner
/// provider; only inner fetch errors reach the caller. Failed fetches are
/// never cached.
#[derive(Debug)]
pub struct CachedHierarchyProvider<P> {
    inner: P,
    cache: Arc<dyn CacheProvider>,
    ttl: Duration,
}

impl<P: HierarchyProvider> CachedHierarchyProvider<P> {
    /// Wraps `inner` with `cache`; entries live for `ttl`.
    pub fn new(inner: P, cache: Arc<dyn CacheProvider>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drops every cached page of `mode`. Returns the number removed.
    pub async fn invalidate_mode(&self, mode: &str) -> AppResult<u64> {
        let removed = self
            .cache
            .delete_pattern(&keys::children_mode_pattern(mode))
            .await?;
        debug!(mode, removed, "Invalidated cached children pages");
        Ok(removed)
    }

    async fn cached_page(&self, key: &str) -> Option<ChildrenPage> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Children cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(page) => Some(page),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable children page");
                None
            }
        }
    }
}

#[async_trait]
impl<P: HierarchyProvider> HierarchyProvider for CachedHierarchyProvider<P> {
    async fn fetch_children(&self, request: &ChildrenRequest) -> AppResult<ChildrenPage> {
        let key = keys::children_page(
            &request.hierarchy_mode,
            &request.level_name,
            request.parent_id.as_deref(),
        );
        if let Some(page) = self.cached_page(&key).await {
            debug!(%request, "Children cache hit");
            return Ok(page);
        }

        let page = self.inner.fetch_children(request).await?;
        match serde_json::to_string(&page) {
            Ok(json) => {
                if let Err(e) = self.cache.set(&key, &json, self.ttl).await {
                    warn!(key, error = %e, "Children cache write failed");
                }
            }
            Err(e) => warn!(key, error = %e, "Failed to serialize children page"),
        }
        Ok(page)
    }
}
