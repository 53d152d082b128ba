//! Flat folder lookup tables for breadcrumb navigation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::{HierarchyBuilder, LeafItem, TreeNode};

/// Key of the root entry in a [`FolderMap`].
pub const ROOT_KEY: &str = "";

/// One folder of a [`FolderMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Encoded cumulative prefix; also the map key.
    pub encoded_path: String,
    /// This folder's own display segment. Empty for the root.
    pub name: String,
    /// Slash-joined display path. Empty for the root.
    pub display_path: String,
    /// Files directly in this folder.
    pub items: Vec<LeafItem>,
    /// Encoded keys of immediate subfolders, sorted.
    pub child_keys: Vec<String>,
}

/// Folder key → folder entry, including a root entry under `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMap {
    entries: BTreeMap<String, FolderNode>,
    /// Identifiers skipped because they could not be decoded.
    #[serde(default)]
    pub skipped: usize,
}

impl FolderMap {
    /// Entry for `key`.
    pub fn get(&self, key: &str) -> Option<&FolderNode> {
        self.entries.get(key)
    }

    /// The root entry, present whenever the source collection was non-empty.
    pub fn root(&self) -> Option<&FolderNode> {
        self.entries.get(ROOT_KEY)
    }

    /// Immediate subfolders of `key`, in `child_keys` order.
    pub fn subfolders(&self, key: &str) -> Vec<&FolderNode> {
        self.get(key)
            .map(|node| {
                node.child_keys
                    .iter()
                    .filter_map(|k| self.entries.get(k))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Root-to-`key` chain of `(encoded key, display name)`, root included.
    ///
    /// Empty when `key` is not in the map.
    pub fn breadcrumbs(&self, key: &str) -> Vec<(String, String)> {
        if !self.entries.contains_key(key) {
            return Vec::new();
        }
        let mut trail = vec![(ROOT_KEY.to_string(), String::new())];
        if key.is_empty() {
            return trail;
        }
        let mut prefix = String::new();
        for segment in key.split(':') {
            if !prefix.is_empty() {
                prefix.push(':');
            }
            prefix.push_str(segment);
            if let Some(node) = self.entries.get(&prefix) {
                trail.push((prefix.clone(), node.name.clone()));
            }
        }
        trail
    }

    /// Number of files across all folders.
    pub fn total_items(&self) -> usize {
        self.entries.values().map(|n| n.items.len()).sum()
    }

    /// Number of entries, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FolderNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Groups flat identifiers by folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderGrouping;

impl FolderGrouping {
    /// Builds the folder tree for `ids` and flattens it into a [`FolderMap`].
    pub fn group_by_folder<I, S>(ids: I) -> FolderMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen_any = false;
        let tree = HierarchyBuilder::build(ids.into_iter().inspect(|_| seen_any = true));

        let mut map = FolderMap {
            entries: BTreeMap::new(),
            skipped: tree.skipped,
        };
        if seen_any {
            flatten(tree.root, &mut map.entries);
        }
        map
    }
}

fn flatten(node: TreeNode, out: &mut BTreeMap<String, FolderNode>) {
    let child_keys = node.children.values().map(|c| c.key.clone()).collect();
    out.insert(
        node.key.clone(),
        FolderNode {
            encoded_path: node.key,
            name: node.name,
            display_path: node.display_path,
            items: node.items,
            child_keys,
        },
    );
    for child in node.children.into_values() {
        flatten(child, out);
    }
}
