//! Hierarchy provider trait for paginated geographic data sources.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::hierarchy::{ChildrenPage, ChildrenRequest};

/// Source of hierarchy nodes, fetched one level at a time.
///
/// Implementations return children sorted by `order` ascending. A failure
/// should be reported as a `Fetch` error so callers can retry.
#[async_trait]
pub trait HierarchyProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the immediate children described by `request`.
    async fn fetch_children(&self, request: &ChildrenRequest) -> AppResult<ChildrenPage>;
}
