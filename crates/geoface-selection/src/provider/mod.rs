//! Hierarchy provider implementations.

pub mod cached;
pub mod static_source;

pub use cached::CachedHierarchyProvider;
pub use static_source::{SeedNode, StaticHierarchyProvider};
