//! Folder tree reconstruction from a flat collection of identifiers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{PathCodec, decode_folder_segment};

/// A file entry placed directly in a folder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeafItem {
    /// The full flat identifier.
    pub id: String,
    /// The raw leaf segment (file name).
    pub name: String,
    /// Human label derived from the leaf.
    pub display_name: String,
}

impl LeafItem {
    fn new(id: &str, leaf: &str) -> Self {
        Self {
            id: id.to_string(),
            name: leaf.to_string(),
            display_name: PathCodec::extract_leaf_display_name(leaf),
        }
    }
}

/// One folder of a reconstructed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Encoded cumulative prefix (`A:B_C`). Empty for the root.
    pub key: String,
    /// Display name of this folder's own segment. Empty for the root.
    pub name: String,
    /// Slash-joined display path (`A/B C`). Empty for the root.
    pub display_path: String,
    /// Files placed directly in this folder, sorted by id.
    pub items: Vec<LeafItem>,
    /// Child folders keyed by their encoded segment.
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn root() -> Self {
        Self {
            key: String::new(),
            name: String::new(),
            display_path: String::new(),
            items: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    fn child(&self, encoded: &str) -> Self {
        let name = decode_folder_segment(encoded);
        let (key, display_path) = if self.key.is_empty() {
            (encoded.to_string(), name.clone())
        } else {
            (
                format!("{}:{encoded}", self.key),
                format!("{}/{name}", self.display_path),
            )
        };
        Self {
            key,
            name,
            display_path,
            items: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Number of folders in this subtree, excluding this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Number of files in this subtree.
    pub fn total_items(&self) -> usize {
        self.items.len() + self.children.values().map(TreeNode::total_items).sum::<usize>()
    }

    /// Depth-first search for the node with encoded key `key`.
    pub fn find(&self, key: &str) -> Option<&TreeNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.values().find_map(|c| {
            if key == c.key || key.starts_with(&format!("{}:", c.key)) {
                c.find(key)
            } else {
                None
            }
        })
    }
}

/// A folder tree rooted at an unnamed root folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root folder (key `""`).
    pub root: TreeNode,
    /// Identifiers that could not be decoded and were left out.
    pub skipped: usize,
}

impl FolderTree {
    /// Whether the tree holds neither folders nor files.
    pub fn is_empty(&self) -> bool {
        self.root.items.is_empty() && self.root.children.is_empty()
    }
}

/// Builds [`FolderTree`]s from flat identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    /// Builds a folder tree.
    ///
    /// Identifiers that fail to decode are skipped. Input order does not
    /// affect the result.
    pub fn build<I, S>(ids: I) -> FolderTree
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = TreeNode::root();
        let mut skipped = 0;

        for id in ids {
            let id = id.as_ref();
            let Some((folders, leaf)) = PathCodec::split_encoded(id) else {
                debug!(id, "Skipping identifier that cannot be decoded");
                skipped += 1;
                continue;
            };

            let mut node = &mut root;
            for encoded in folders {
                let fresh = node.child(encoded);
                node = node.children.entry(encoded.to_string()).or_insert(fresh);
            }
            node.items.push(LeafItem::new(id, leaf));
        }

        sort_items(&mut root);
        FolderTree { root, skipped }
    }
}

fn sort_items(node: &mut TreeNode) {
    node.items.sort();
    for child in node.children.values_mut() {
        sort_items(child);
    }
}
