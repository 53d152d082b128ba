//! In-memory hierarchy provider backed by a seeded data set.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use geoface_core::error::AppError;
use geoface_core::result::AppResult;
use geoface_core::traits::hierarchy::HierarchyProvider;
use geoface_core::types::hierarchy::{ChildrenPage, ChildrenRequest, HierarchyRecord};

/// One node of the seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedNode {
    /// External identifier, unique within its mode.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Level name.
    pub level: String,
    /// Sort position among siblings.
    #[serde(default)]
    pub order: i64,
    /// Optional external code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parent id; absent for top-level nodes.
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// (level name, parent id) → children sorted by order.
type ModeIndex = HashMap<(String, Option<String>), Vec<HierarchyRecord>>;

/// Hierarchy provider answering from an in-memory seed.
#[derive(Debug, Clone, Default)]
pub struct StaticHierarchyProvider {
    modes: HashMap<String, ModeIndex>,
}

impl StaticHierarchyProvider {
    /// Builds the provider from mode name → seed nodes.
    pub fn from_seed(seed: HashMap<String, Vec<SeedNode>>) -> Self {
        let modes = seed
            .into_iter()
            .map(|(mode, nodes)| (mode, index_mode(nodes)))
            .collect();
        Self { modes }
    }

    /// Parses a seed document: `{ "<MODE>": [SeedNode, ...], ... }`.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let seed: HashMap<String, Vec<SeedNode>> = serde_json::from_str(json)?;
        Ok(Self::from_seed(seed))
    }

    /// Reads and parses a seed file.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to read hierarchy file '{}': {e}",
                path.display()
            ))
        })?;
        let provider = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            modes = provider.modes.len(),
            "Hierarchy seed loaded"
        );
        Ok(provider)
    }

    /// Names of the seeded modes.
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }
}

fn index_mode(nodes: Vec<SeedNode>) -> ModeIndex {
    let parents: HashMap<&str, (&str, Option<&str>)> = nodes
        .iter()
        .map(|n| (n.id.as_str(), (n.name.as_str(), n.parent_id.as_deref())))
        .collect();

    let path_of = |id: &str| -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        // A cycle in the seed cannot be longer than the node count.
        while let Some(cur) = current {
            if names.len() > parents.len() {
                break;
            }
            let Some((name, parent)) = parents.get(cur) else {
                break;
            };
            names.push(*name);
            current = *parent;
        }
        names.reverse();
        names.join("/")
    };

    let mut index = ModeIndex::new();
    for node in &nodes {
        index
            .entry((node.level.clone(), node.parent_id.clone()))
            .or_default()
            .push(HierarchyRecord {
                id: node.id.clone(),
                name: node.name.clone(),
                path: path_of(&node.id),
                level: node.level.clone(),
                order: node.order,
                code: node.code.clone(),
            });
    }
    for children in index.values_mut() {
        children.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
    }
    index
}

#[async_trait]
impl HierarchyProvider for StaticHierarchyProvider {
    async fn fetch_children(&self, request: &ChildrenRequest) -> AppResult<ChildrenPage> {
        let mode = self.modes.get(&request.hierarchy_mode).ok_or_else(|| {
            AppError::not_found(format!(
                "Hierarchy mode '{}' is not seeded",
                request.hierarchy_mode
            ))
        })?;
        let nodes = mode
            .get(&(request.level_name.clone(), request.parent_id.clone()))
            .cloned()
            .unwrap_or_default();
        Ok(ChildrenPage::new(nodes))
    }
}
