//! Core traits defined in `geoface-core` and implemented by other crates.

pub mod cache;
pub mod hierarchy;

pub use cache::CacheProvider;
pub use hierarchy::HierarchyProvider;
