//! Integration tests for the cached folder index.

mod helpers;

use std::sync::Arc;

use geoface_cache::CacheManager;
use geoface_path::FolderIndex;

const BATCH_ONE: [&str; 3] = [
    "PNG:CENTRAL:ABAU:130168381_Mea_Kila_F.jpg",
    "PNG:CENTRAL:ABAU:130168382_Hera_Vagi_M.jpg",
    "PNG:CENTRAL:GOILALA:130168383_Tau_Morea_M.jpg",
];

async fn make_index() -> FolderIndex {
    let ctx = helpers::TestContext::new().await;
    let cache = CacheManager::new(&ctx.config.cache).unwrap();
    FolderIndex::new(Arc::new(cache), &ctx.config.path)
}

#[tokio::test]
async fn test_collections_are_cached_independently() {
    let index = make_index().await;

    let central = index.folders("central-2024", BATCH_ONE).await.unwrap();
    let western = index
        .folders("western-2024", ["PNG:WESTERN:NORTH_FLY:130170001_Kaso_Bai_F.jpg"])
        .await
        .unwrap();

    assert_eq!(central.get("PNG:CENTRAL:ABAU").unwrap().items.len(), 2);
    assert!(central.get("PNG:WESTERN").is_none());
    assert_eq!(
        western.get("PNG:WESTERN:NORTH_FLY").unwrap().display_path,
        "PNG/WESTERN/NORTH FLY"
    );
}

#[tokio::test]
async fn test_refresh_after_upload() {
    let index = make_index().await;
    index.folders("central-2024", BATCH_ONE).await.unwrap();

    let mut uploaded = BATCH_ONE.to_vec();
    uploaded.push("PNG:CENTRAL:KAIRUKU:130168384_Iru_Gege_F.jpg");

    // Still served from cache until refreshed.
    let cached = index.folders("central-2024", &uploaded).await.unwrap();
    assert!(cached.get("PNG:CENTRAL:KAIRUKU").is_none());

    let fresh = index.refresh("central-2024", &uploaded).await.unwrap();
    assert_eq!(fresh.total_items(), 4);
    assert_eq!(fresh.subfolders("PNG:CENTRAL").len(), 3);
}

#[tokio::test]
async fn test_evicted_collection_is_rebuilt() {
    let index = make_index().await;
    index.folders("central-2024", BATCH_ONE).await.unwrap();
    index.evict("central-2024").await.unwrap();

    let rebuilt = index
        .folders("central-2024", ["PNG:CENTRAL:ABAU:130168381_Mea_Kila_F.jpg"])
        .await
        .unwrap();
    assert_eq!(rebuilt.total_items(), 1);
}
