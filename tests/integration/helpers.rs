//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use geoface_cache::memory::MemoryCacheProvider;
use geoface_core::config::AppConfig;
use geoface_core::config::cache::MemoryCacheConfig;
use geoface_core::traits::hierarchy::HierarchyProvider;
use geoface_selection::{SelectionTree, SelectionTreeConfig, StaticHierarchyProvider};

/// Test context built from the shipped configuration and sample data.
pub struct TestContext {
    /// Merged configuration
    pub config: AppConfig,
    /// Sample hierarchy
    pub provider: Arc<StaticHierarchyProvider>,
}

impl TestContext {
    /// Loads `config/default.toml` and the source file it names.
    pub async fn new() -> Self {
        let config = AppConfig::load("config/default.toml", None).expect("Failed to load config");
        let provider = StaticHierarchyProvider::load(&config.hierarchy.source_file)
            .await
            .expect("Failed to load hierarchy data");
        Self {
            config,
            provider: Arc::new(provider),
        }
    }

    /// Tree over the sample data for `mode`.
    pub fn tree(&self, mode: &str, min_level: usize) -> SelectionTree {
        self.tree_with(self.provider.clone(), mode, min_level)
    }

    /// Tree over an arbitrary provider, using the configured levels of `mode`.
    pub fn tree_with(
        &self,
        provider: Arc<dyn HierarchyProvider>,
        mode: &str,
        min_level: usize,
    ) -> SelectionTree {
        let levels = self
            .config
            .hierarchy
            .level_tables()
            .and_then(|modes| modes.get(mode).cloned())
            .expect("Unknown mode");
        SelectionTree::new(
            provider,
            SelectionTreeConfig {
                mode: mode.to_string(),
                levels,
                min_level,
            },
        )
    }
}

/// Fresh in-memory cache.
pub fn memory_cache() -> Arc<MemoryCacheProvider> {
    Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default(), 60))
}

/// Expands `path` segment by segment from the top level.
pub async fn open_path(tree: &SelectionTree, path: &str) {
    if tree.is_empty() {
        tree.load_roots().await.expect("Failed to load roots");
    }
    let mut prefix = String::new();
    for segment in path.split('/') {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        let key = tree.find_by_path(&prefix).expect("Path not loaded");
        tree.expand(key).await.expect("Failed to expand");
    }
}
