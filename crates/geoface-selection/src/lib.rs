//! # geoface-selection
//!
//! Interactive selection over an externally paginated location hierarchy
//! (province → district → LLG → ward, region → district → constituency, …).
//!
//! Nodes are fetched one level at a time on first expansion. Every node
//! carries a tri-state selection; toggling a node pushes its new state down
//! to loaded descendants and recomputes every ancestor. Nodes shallower than
//! the configured minimum level never appear in the submitted selection.

pub mod arena;
pub mod node;
pub mod provider;
pub mod tree;
pub mod validate;

pub use node::{LoadState, NodeKey, Selection, SelectionNode, VisibleRow};
pub use provider::{CachedHierarchyProvider, StaticHierarchyProvider};
pub use tree::{SelectionTree, SelectionTreeConfig};
pub use validate::{path_depth, validate};
