//! Core type definitions used across the Geoface workspace.

pub mod hierarchy;
pub mod level;

pub use hierarchy::{ChildrenPage, ChildrenRequest, HierarchyRecord};
pub use level::{HierarchyModes, LevelTable};
