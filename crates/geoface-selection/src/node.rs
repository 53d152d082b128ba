//! Selection tree node types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable arena key of a node. Keys are never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The hidden root whose children are the top-level nodes.
    pub const ROOT: NodeKey = NodeKey(0);

    /// Whether this is the hidden root.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tri-state selection value.
///
/// `Indeterminate` is only ever derived from children, never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Not selected.
    Unchecked,
    /// Selected, including every loaded descendant.
    Checked,
    /// Some but not all loaded descendants selected.
    Indeterminate,
}

impl Selection {
    /// The state a toggle moves to.
    pub fn toggled(self) -> Selection {
        match self {
            Selection::Checked => Selection::Unchecked,
            Selection::Unchecked | Selection::Indeterminate => Selection::Checked,
        }
    }

    /// Derives a parent state from its children's states.
    pub fn from_children<I: IntoIterator<Item = Selection>>(children: I) -> Option<Selection> {
        let mut any = false;
        let mut all_checked = true;
        let mut all_unchecked = true;
        for state in children {
            any = true;
            all_checked &= state == Selection::Checked;
            all_unchecked &= state == Selection::Unchecked;
        }
        if !any {
            None
        } else if all_checked {
            Some(Selection::Checked)
        } else if all_unchecked {
            Some(Selection::Unchecked)
        } else {
            Some(Selection::Indeterminate)
        }
    }
}

/// Children loading state of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Children never fetched.
    Unloaded,
    /// A fetch is in flight. `ticket` identifies that fetch.
    Loading {
        /// Identifier of the in-flight fetch.
        ticket: u64,
    },
    /// Children fetched and owned by this node.
    Loaded {
        /// Child keys in provider order.
        children: Vec<NodeKey>,
        /// Whether the children are shown.
        expanded: bool,
    },
}

/// One node of the selection tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionNode {
    /// External identifier.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Slash-joined names from the top level down to this node.
    pub path: String,
    /// Depth below the top level (top level = 0).
    pub depth: usize,
    /// Level name of this node in its hierarchy mode.
    pub level: String,
    /// Sort position among siblings as given by the provider.
    pub order: i64,
    /// Optional external code.
    pub code: Option<String>,
    /// Parent key; `NodeKey::ROOT` for top-level nodes.
    pub parent: Option<NodeKey>,
    /// Selection value.
    pub selection: Selection,
    /// Children loading state.
    pub load: LoadState,
}

impl SelectionNode {
    /// Whether children have been fetched.
    pub fn is_loaded(&self) -> bool {
        matches!(self.load, LoadState::Loaded { .. })
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }

    /// Whether children are loaded and shown.
    pub fn is_expanded(&self) -> bool {
        matches!(self.load, LoadState::Loaded { expanded: true, .. })
    }

    /// Loaded child keys; empty when not loaded.
    pub fn children(&self) -> &[NodeKey] {
        match &self.load {
            LoadState::Loaded { children, .. } => children,
            _ => &[],
        }
    }
}

/// A flattened, display-ready node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRow {
    /// Node key.
    pub key: NodeKey,
    /// Depth below the top level.
    pub depth: usize,
    /// Display name.
    pub name: String,
    /// Slash-joined path.
    pub path: String,
    /// Selection value.
    pub selection: Selection,
    /// Whether the node is expanded.
    pub expanded: bool,
    /// Whether children have been fetched.
    pub loaded: bool,
    /// Checked but shallower than the minimum level.
    pub too_shallow: bool,
}
