//! Wire shapes exchanged with an external hierarchy provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request for the immediate children of one hierarchy node.
///
/// `parent_id` is `None` when requesting the top level of a mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenRequest {
    /// Hierarchy mode, e.g. `"PNG"` or `"ABG"`.
    pub hierarchy_mode: String,
    /// Name of the level being fetched, e.g. `"district"`.
    pub level_name: String,
    /// External id of the parent node.
    pub parent_id: Option<String>,
}

impl ChildrenRequest {
    /// Creates a request for the children of `parent_id` at `level_name`.
    pub fn new(
        hierarchy_mode: impl Into<String>,
        level_name: impl Into<String>,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            hierarchy_mode: hierarchy_mode.into(),
            level_name: level_name.into(),
            parent_id,
        }
    }
}

impl fmt::Display for ChildrenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.hierarchy_mode,
            self.level_name,
            self.parent_id.as_deref().unwrap_or("-")
        )
    }
}

/// One node returned by a hierarchy provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyRecord {
    /// External identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Provider-side path of the node (informational).
    #[serde(default)]
    pub path: String,
    /// Level name of the node.
    pub level: String,
    /// Sort position among its siblings.
    #[serde(default)]
    pub order: i64,
    /// Optional external code (electoral or census code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Response to a [`ChildrenRequest`].
///
/// Nodes arrive sorted by `order` ascending and are used as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenPage {
    /// The child nodes.
    pub nodes: Vec<HierarchyRecord>,
}

impl ChildrenPage {
    /// Creates a page from a list of nodes.
    pub fn new(nodes: Vec<HierarchyRecord>) -> Self {
        Self { nodes }
    }

    /// Whether the page has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
