//! Arena storage for selection tree nodes.
//!
//! Nodes live in a flat map addressed by [`NodeKey`]; parent links and
//! child lists are keys, so toggling or loading touches only the affected
//! entries.

use std::collections::HashMap;

use geoface_core::error::AppError;
use geoface_core::result::AppResult;
use geoface_core::types::hierarchy::HierarchyRecord;

use crate::node::{LoadState, NodeKey, Selection, SelectionNode};

/// Flat node storage with a hidden root under [`NodeKey::ROOT`].
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: HashMap<NodeKey, SelectionNode>,
    next_key: u64,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    /// Creates an arena holding only the hidden root.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an empty arena whose first key is `next_key`.
    ///
    /// Used when replacing a tree so keys handed out by the previous arena
    /// never resolve in the new one.
    pub fn starting_at(next_key: u64) -> Self {
        let root = SelectionNode {
            id: String::new(),
            display_name: String::new(),
            path: String::new(),
            depth: 0,
            level: String::new(),
            order: 0,
            code: None,
            parent: None,
            selection: Selection::Unchecked,
            load: LoadState::Unloaded,
        };
        let mut nodes = HashMap::new();
        nodes.insert(NodeKey::ROOT, root);
        Self {
            nodes,
            next_key: next_key.max(1),
        }
    }

    /// Key the next attached node will receive.
    pub fn next_key(&self) -> u64 {
        self.next_key
    }

    /// Node under `key`.
    pub fn get(&self, key: NodeKey) -> Option<&SelectionNode> {
        self.nodes.get(&key)
    }

    /// Node under `key`, or a `NotFound` error.
    pub fn require(&self, key: NodeKey) -> AppResult<&SelectionNode> {
        self.nodes
            .get(&key)
            .ok_or_else(|| AppError::not_found(format!("Selection node {key} not found")))
    }

    fn require_mut(&mut self, key: NodeKey) -> AppResult<&mut SelectionNode> {
        self.nodes
            .get_mut(&key)
            .ok_or_else(|| AppError::not_found(format!("Selection node {key} not found")))
    }

    /// Number of nodes, hidden root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether only the hidden root is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth assigned to children of `parent`.
    pub fn child_depth(&self, parent: NodeKey) -> AppResult<usize> {
        if parent.is_root() {
            Ok(0)
        } else {
            Ok(self.require(parent)?.depth + 1)
        }
    }

    /// Marks `key` as loading under fetch `ticket`.
    pub fn begin_loading(&mut self, key: NodeKey, ticket: u64) -> AppResult<()> {
        self.require_mut(key)?.load = LoadState::Loading { ticket };
        Ok(())
    }

    /// Returns `key` to `Unloaded` after a failed fetch.
    pub fn rollback_loading(&mut self, key: NodeKey) -> AppResult<()> {
        let node = self.require_mut(key)?;
        if node.is_loading() {
            node.load = LoadState::Unloaded;
        }
        Ok(())
    }

    /// Stores fetched children under `parent`, which becomes loaded and
    /// expanded.
    ///
    /// New children take the parent's explicit state: a checked parent
    /// yields checked children, anything else yields unchecked ones.
    pub fn attach_children(
        &mut self,
        parent: NodeKey,
        records: Vec<HierarchyRecord>,
    ) -> AppResult<Vec<NodeKey>> {
        let depth = self.child_depth(parent)?;
        let (parent_path, parent_selection) = {
            let node = self.require(parent)?;
            (node.path.clone(), node.selection)
        };
        let inherited = match parent_selection {
            Selection::Checked if !parent.is_root() => Selection::Checked,
            _ => Selection::Unchecked,
        };

        let mut children = Vec::with_capacity(records.len());
        for record in records {
            let key = NodeKey(self.next_key);
            self.next_key += 1;

            let path = if parent_path.is_empty() {
                record.name.clone()
            } else {
                format!("{parent_path}/{}", record.name)
            };
            self.nodes.insert(
                key,
                SelectionNode {
                    id: record.id,
                    display_name: record.name,
                    path,
                    depth,
                    level: record.level,
                    order: record.order,
                    code: record.code,
                    parent: Some(parent),
                    selection: inherited,
                    load: LoadState::Unloaded,
                },
            );
            children.push(key);
        }

        self.require_mut(parent)?.load = LoadState::Loaded {
            children: children.clone(),
            expanded: true,
        };
        if let Some(first) = children.first() {
            self.recompute_ancestors(*first);
        }
        Ok(children)
    }

    /// Shows or hides the children of a loaded node. No-op otherwise.
    pub fn set_expanded(&mut self, key: NodeKey, value: bool) -> AppResult<()> {
        if let LoadState::Loaded { expanded, .. } = &mut self.require_mut(key)?.load {
            *expanded = value;
        }
        Ok(())
    }

    /// Drops every descendant of `key` and marks it `Unloaded`. Returns
    /// the removed keys.
    ///
    /// The node keeps its own selection unless it was indeterminate, in
    /// which case it falls back to unchecked and its ancestors are
    /// recomputed.
    pub fn clear_children(&mut self, key: NodeKey) -> AppResult<Vec<NodeKey>> {
        self.require(key)?;
        let descendants = self.descendants(key);
        for d in &descendants {
            self.nodes.remove(d);
        }
        let node = self.require_mut(key)?;
        node.load = LoadState::Unloaded;
        if node.selection == Selection::Indeterminate {
            node.selection = Selection::Unchecked;
        }
        self.recompute_ancestors(key);
        Ok(descendants)
    }

    /// Flips the explicit intent of `key`, pushes it to loaded descendants
    /// and recomputes ancestors. Returns the new state of `key`.
    pub fn toggle(&mut self, key: NodeKey) -> AppResult<Selection> {
        if key.is_root() {
            return Err(AppError::validation("The hidden root cannot be toggled"));
        }
        let target = self.require(key)?.selection.toggled();
        self.set_subtree(key, target);
        self.recompute_ancestors(key);
        Ok(target)
    }

    /// Sets `key` and every loaded descendant to `state`.
    pub fn set_subtree(&mut self, key: NodeKey, state: Selection) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.selection = state;
                stack.extend(node.children().iter().copied());
            }
        }
    }

    /// Recomputes every ancestor of `key` from its loaded children.
    pub fn recompute_ancestors(&mut self, key: NodeKey) {
        let mut current = self.nodes.get(&key).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent.is_root() {
                break;
            }
            let derived = self.nodes.get(&parent).and_then(|node| {
                Selection::from_children(
                    node.children()
                        .iter()
                        .filter_map(|c| self.nodes.get(c).map(|n| n.selection)),
                )
            });
            let Some(node) = self.nodes.get_mut(&parent) else {
                break;
            };
            if let Some(state) = derived {
                node.selection = state;
            }
            current = node.parent;
        }
    }

    /// Pre-order list of loaded descendants of `key`, `key` excluded.
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self
            .nodes
            .get(&key)
            .map(|n| n.children().iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children().iter().rev().copied());
            }
        }
        out
    }

    /// Looks up a node by its slash-joined path.
    pub fn find_by_path(&self, path: &str) -> Option<NodeKey> {
        let mut current = NodeKey::ROOT;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let node = self.nodes.get(&current)?;
            current = node
                .children()
                .iter()
                .copied()
                .find(|c| self.nodes.get(c).is_some_and(|n| n.display_name == segment))?;
        }
        (!current.is_root()).then_some(current)
    }

    /// Checks the tri-state rule for every loaded node. Returns offenders.
    pub fn inconsistent_nodes(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(key, _)| !key.is_root())
            .filter_map(|(key, node)| {
                let derived = Selection::from_children(
                    node.children()
                        .iter()
                        .filter_map(|c| self.nodes.get(c).map(|n| n.selection)),
                )?;
                (derived != node.selection).then_some(*key)
            })
            .collect()
    }
}
