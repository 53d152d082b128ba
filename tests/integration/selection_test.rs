//! Integration tests for the lazily loaded selection tree.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use geoface_cache::keys;
use geoface_core::error::{AppError, ErrorKind};
use geoface_core::result::AppResult;
use geoface_core::traits::cache::CacheProvider;
use geoface_core::traits::hierarchy::HierarchyProvider;
use geoface_core::types::hierarchy::{ChildrenPage, ChildrenRequest};
use geoface_selection::{CachedHierarchyProvider, Selection, StaticHierarchyProvider, validate};

/// Fails the first `failures` fetches, then delegates.
#[derive(Debug)]
struct FlakyProvider {
    inner: Arc<StaticHierarchyProvider>,
    failures: AtomicUsize,
}

#[async_trait]
impl HierarchyProvider for FlakyProvider {
    async fn fetch_children(&self, request: &ChildrenRequest) -> AppResult<ChildrenPage> {
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AppError::fetch("gateway timeout"));
        }
        self.inner.fetch_children(request).await
    }
}

#[tokio::test]
async fn test_partial_then_full_district_selection() {
    let ctx = helpers::TestContext::new().await;
    let tree = ctx.tree("PNG", 1);
    helpers::open_path(&tree, "Central").await;

    let central = tree.find_by_path("Central").unwrap();
    let districts = tree.children(central);
    assert_eq!(districts.len(), 3);

    tree.toggle(districts[0]).unwrap();
    assert_eq!(tree.node(central).unwrap().selection, Selection::Indeterminate);
    tree.toggle(districts[1]).unwrap();
    tree.toggle(districts[2]).unwrap();
    assert_eq!(tree.node(central).unwrap().selection, Selection::Checked);

    tree.toggle(districts[1]).unwrap();
    assert_eq!(tree.node(central).unwrap().selection, Selection::Indeterminate);
    assert!(tree.inconsistent_nodes().is_empty());
}

#[tokio::test]
async fn test_minimum_level_gates_submission() {
    let ctx = helpers::TestContext::new().await;
    let tree = ctx.tree("PNG", 2);
    helpers::open_path(&tree, "Central").await;

    tree.toggle(tree.find_by_path("Central/Abau").unwrap()).unwrap();
    assert!(tree.collect_selected_paths().is_empty());
    assert_eq!(tree.invalid_selections(), vec!["Central/Abau"]);
    assert_eq!(validate(&tree.checked_paths(), 2).len(), 1);
    assert!(!tree.can_submit());

    // Going one level deeper makes the selection valid.
    tree.toggle(tree.find_by_path("Central/Abau").unwrap()).unwrap();
    helpers::open_path(&tree, "Central/Abau").await;
    tree.toggle(tree.find_by_path("Central/Abau/Aroma Rural").unwrap())
        .unwrap();
    assert_eq!(tree.collect_selected_paths(), vec!["Central/Abau/Aroma Rural"]);
    assert!(tree.can_submit());
}

#[tokio::test]
async fn test_checked_branch_loads_checked_children() {
    let ctx = helpers::TestContext::new().await;
    let tree = ctx.tree("PNG", 1);
    helpers::open_path(&tree, "Central").await;

    let abau = tree.find_by_path("Central/Abau").unwrap();
    tree.toggle(abau).unwrap();
    helpers::open_path(&tree, "Central/Abau/Aroma Rural").await;

    let selected = tree.collect_selected_paths();
    assert!(selected.contains(&"Central/Abau/Aroma Rural/Ward 2".to_string()));
    assert!(selected.contains(&"Central/Abau/Cloudy Bay Rural".to_string()));
    assert!(tree.inconsistent_nodes().is_empty());
}

#[tokio::test]
async fn test_switching_to_abg() {
    let ctx = helpers::TestContext::new().await;
    let tree = ctx.tree("PNG", 1);
    helpers::open_path(&tree, "Central").await;
    tree.toggle(tree.find_by_path("Central/Abau").unwrap()).unwrap();

    let abg = ctx.config.hierarchy.level_tables().unwrap().get("ABG").unwrap().clone();
    tree.switch_mode("ABG", abg);
    assert!(tree.is_empty());
    assert!(tree.checked_paths().is_empty());

    helpers::open_path(&tree, "North Bougainville/Buka").await;
    let rows = tree.visible_rows();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "North Bougainville",
            "Buka",
            "Hagogohe",
            "Halia",
            "Central Bougainville"
        ]
    );
}

#[tokio::test]
async fn test_fetch_failure_is_retryable() {
    let ctx = helpers::TestContext::new().await;
    let provider = Arc::new(FlakyProvider {
        inner: ctx.provider.clone(),
        failures: AtomicUsize::new(1),
    });
    let tree = ctx.tree_with(provider, "PNG", 1);

    let err = tree.load_roots().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Fetch);
    assert!(err.is_retryable());

    tree.load_roots().await.unwrap();
    assert_eq!(tree.roots().len(), 2);
}

#[tokio::test]
async fn test_trees_share_cached_pages() {
    let ctx = helpers::TestContext::new().await;
    let cache = helpers::memory_cache();
    let provider = Arc::new(CachedHierarchyProvider::new(
        StaticHierarchyProvider::load(&ctx.config.hierarchy.source_file)
            .await
            .unwrap(),
        cache.clone(),
        Duration::from_secs(ctx.config.cache.default_ttl_seconds),
    ));

    let first = ctx.tree_with(provider.clone(), "PNG", 1);
    helpers::open_path(&first, "Central").await;
    assert!(
        cache
            .exists(&keys::children_page("PNG", "district", Some("png-03")))
            .await
            .unwrap()
    );

    let second = ctx.tree_with(provider.clone(), "PNG", 1);
    helpers::open_path(&second, "Central").await;
    assert_eq!(second.len(), first.len());

    provider.invalidate_mode("PNG").await.unwrap();
    assert!(
        !cache
            .exists(&keys::children_page("PNG", "province", None))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_unreadable_seed_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.json");
    std::fs::write(&file, "{ \"PNG\": [ { \"id\": 1 } ] }").unwrap();

    let err = StaticHierarchyProvider::load(&file).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Serialization);
}
