//! Table-driven mapping from tree depth to named hierarchy level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Ordered level names for one hierarchy mode. Index = depth (root = 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    levels: Vec<String>,
}

impl LevelTable {
    /// Creates a level table. At least one level is required.
    pub fn new<I, S>(levels: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels: Vec<String> = levels.into_iter().map(Into::into).collect();
        if levels.is_empty() {
            return Err(AppError::configuration(
                "A hierarchy mode needs at least one level",
            ));
        }
        if let Some(blank) = levels.iter().position(|l| l.trim().is_empty()) {
            return Err(AppError::configuration(format!(
                "Level name at depth {blank} is empty"
            )));
        }
        Ok(Self { levels })
    }

    /// Number of levels (deepest depth + 1).
    pub fn depth_count(&self) -> usize {
        self.levels.len()
    }

    /// Name of the level at `depth`.
    pub fn level_name(&self, depth: usize) -> AppResult<&str> {
        self.levels.get(depth).map(String::as_str).ok_or_else(|| {
            AppError::configuration(format!(
                "Depth {depth} is beyond the deepest level ({}) of this mode",
                self.levels.len().saturating_sub(1)
            ))
        })
    }

    /// Name of the level fetched when expanding a node at `depth`.
    pub fn child_level(&self, depth: usize) -> AppResult<&str> {
        self.level_name(depth + 1)
    }

    /// Whether nodes at `depth` sit on the deepest level.
    pub fn is_leaf_depth(&self, depth: usize) -> bool {
        depth + 1 >= self.levels.len()
    }

    /// Iterates level names from root to leaf.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(String::as_str)
    }
}

/// Hierarchy mode name → level table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyModes {
    modes: BTreeMap<String, LevelTable>,
}

impl HierarchyModes {
    /// Creates an empty mode registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a mode.
    pub fn insert(&mut self, mode: impl Into<String>, table: LevelTable) {
        self.modes.insert(mode.into(), table);
    }

    /// Level table for `mode`.
    pub fn get(&self, mode: &str) -> AppResult<&LevelTable> {
        self.modes
            .get(mode)
            .ok_or_else(|| AppError::configuration(format!("Unknown hierarchy mode: '{mode}'")))
    }

    /// Registered mode names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }
}
