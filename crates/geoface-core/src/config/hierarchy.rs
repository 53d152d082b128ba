//! Hierarchy mode and selection configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::level::{HierarchyModes, LevelTable};

/// Hierarchy modes, their level tables, and selection rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Mode used when none is requested explicitly.
    #[serde(default = "default_mode")]
    pub default_mode: String,
    /// Minimum depth a selected node must have to be submitted.
    #[serde(default = "default_min_level")]
    pub min_level: usize,
    /// JSON file holding the hierarchy data set.
    #[serde(default = "default_source_file")]
    pub source_file: String,
    /// Whether fetched child pages are cached.
    #[serde(default = "default_true")]
    pub cache_children: bool,
    /// Mode name → level names from root to leaf.
    #[serde(default = "default_modes")]
    pub modes: BTreeMap<String, Vec<String>>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            min_level: default_min_level(),
            source_file: default_source_file(),
            cache_children: default_true(),
            modes: default_modes(),
        }
    }
}

impl HierarchyConfig {
    /// Builds the level tables for every configured mode.
    pub fn level_tables(&self) -> AppResult<HierarchyModes> {
        let mut modes = HierarchyModes::new();
        for (name, levels) in &self.modes {
            let table = LevelTable::new(levels.iter().cloned()).map_err(|e| {
                AppError::configuration(format!("Mode '{name}': {}", e.message))
            })?;
            modes.insert(name.clone(), table);
        }
        Ok(modes)
    }

    /// Checks that the default mode exists and `min_level` is reachable in it.
    pub fn validate(&self) -> AppResult<()> {
        let modes = self.level_tables()?;
        let table = modes.get(&self.default_mode)?;
        if self.min_level >= table.depth_count() {
            return Err(AppError::configuration(format!(
                "min_level {} exceeds the deepest level of mode '{}'",
                self.min_level, self.default_mode
            )));
        }
        Ok(())
    }
}

fn default_mode() -> String {
    "PNG".to_string()
}

fn default_min_level() -> usize {
    1
}

fn default_source_file() -> String {
    "data/hierarchy.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_modes() -> BTreeMap<String, Vec<String>> {
    let mut modes = BTreeMap::new();
    modes.insert(
        "PNG".to_string(),
        ["province", "district", "llg", "ward"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    modes.insert(
        "ABG".to_string(),
        ["region", "district", "constituency"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    modes
}
