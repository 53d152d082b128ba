//! # geoface-path
//!
//! Turns hierarchical storage paths such as
//! `REGION/PROVINCE/DISTRICT/file.jpg` into flat identifiers that satisfy
//! the recognition API's external-id alphabet, and rebuilds navigable
//! folder structures from a flat collection of those identifiers.
//!
//! - [`codec`]: encode/decode between structured paths and flat identifiers
//! - [`builder`]: reconstruct a folder tree from identifiers
//! - [`grouping`]: flatten that tree into a key → folder lookup table
//! - [`index`]: cache grouped folder maps per collection

pub mod builder;
pub mod codec;
pub mod grouping;
pub mod index;

pub use builder::{FolderTree, HierarchyBuilder, LeafItem, TreeNode};
pub use codec::{PathCodec, StructuredPath};
pub use grouping::{FolderGrouping, FolderMap, FolderNode};
pub use index::FolderIndex;
