//! Cache key builders for all Geoface cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Prefix applied to all Geoface cache keys.
const PREFIX: &str = "geoface";

// ── Hierarchy keys ─────────────────────────────────────────

/// Cache key for one page of hierarchy children.
pub fn children_page(mode: &str, level: &str, parent_id: Option<&str>) -> String {
    format!(
        "{PREFIX}:children:{mode}:{level}:{}",
        parent_id.unwrap_or("-")
    )
}

/// Pattern to invalidate every cached children page of a mode.
pub fn children_mode_pattern(mode: &str) -> String {
    format!("{PREFIX}:children:{mode}:*")
}

// ── Folder index keys ──────────────────────────────────────

/// Cache key for the grouped folder map of a collection.
pub fn folder_index(collection_id: &str) -> String {
    format!("{PREFIX}:folders:{collection_id}")
}

/// Pattern to invalidate every grouped folder map.
pub fn folder_index_pattern() -> String {
    format!("{PREFIX}:folders:*")
}
