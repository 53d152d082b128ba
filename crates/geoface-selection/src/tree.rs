//! Lazily loaded tri-state selection tree.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

use geoface_core::error::AppError;
use geoface_core::result::AppResult;
use geoface_core::traits::hierarchy::HierarchyProvider;
use geoface_core::types::hierarchy::{ChildrenPage, ChildrenRequest};
use geoface_core::types::level::LevelTable;

use crate::arena::NodeArena;
use crate::node::{LoadState, NodeKey, Selection, SelectionNode, VisibleRow};
use crate::validate;

type SharedFetch = Shared<BoxFuture<'static, AppResult<ChildrenPage>>>;

/// Mode, levels and depth rule of a selection tree.
#[derive(Debug, Clone)]
pub struct SelectionTreeConfig {
    /// Hierarchy mode sent with every fetch.
    pub mode: String,
    /// Level names of the mode.
    pub levels: LevelTable,
    /// Minimum depth for a selection to be submitted.
    pub min_level: usize,
}

/// What `expand` has to do for a node.
enum Pending {
    Loaded,
    Join(u64),
    Start,
}

/// Everything guarded by the tree lock.
struct TreeState {
    arena: NodeArena,
    mode: String,
    levels: LevelTable,
    /// Bumped on every mode switch; fetches from older generations are dropped.
    generation: u64,
    next_ticket: u64,
    in_flight: HashMap<NodeKey, SharedFetch>,
}

impl fmt::Debug for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeState")
            .field("mode", &self.mode)
            .field("generation", &self.generation)
            .field("nodes", &self.arena.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl TreeState {
    fn children_request(&self, key: NodeKey) -> AppResult<ChildrenRequest> {
        if key.is_root() {
            let level = self.levels.level_name(0)?;
            return Ok(ChildrenRequest::new(&self.mode, level, None));
        }
        let node = self.arena.require(key)?;
        let level = self.levels.child_level(node.depth)?;
        Ok(ChildrenRequest::new(&self.mode, level, Some(node.id.clone())))
    }
}

/// Selection over an externally paginated hierarchy.
///
/// All methods take `&self`; the tree is shared behind an `Arc` by callers
/// that expand several branches at once. The lock is never held across a
/// fetch, so `toggle` always sees and leaves a fully consistent tree.
#[derive(Debug)]
pub struct SelectionTree {
    provider: Arc<dyn HierarchyProvider>,
    min_level: usize,
    state: Mutex<TreeState>,
}

impl SelectionTree {
    /// Creates an empty tree. Call [`load_roots`](Self::load_roots) to fetch
    /// the top level.
    pub fn new(provider: Arc<dyn HierarchyProvider>, config: SelectionTreeConfig) -> Self {
        Self {
            provider,
            min_level: config.min_level,
            state: Mutex::new(TreeState {
                arena: NodeArena::new(),
                mode: config.mode,
                levels: config.levels,
                generation: 0,
                next_ticket: 1,
                in_flight: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TreeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current hierarchy mode.
    pub fn mode(&self) -> String {
        self.lock().mode.clone()
    }

    /// Minimum depth for a submittable selection.
    pub fn min_level(&self) -> usize {
        self.min_level
    }

    /// Fetches the top-level nodes.
    pub async fn load_roots(&self) -> AppResult<()> {
        self.expand(NodeKey::ROOT).await
    }

    /// Expands `key`, fetching its children on first use.
    ///
    /// A second call while a fetch is in flight awaits that same fetch. On
    /// failure the node returns to unloaded and the error is returned; the
    /// next call fetches again. Expanding a node on the deepest level of the
    /// mode is a configuration error.
    pub async fn expand(&self, key: NodeKey) -> AppResult<()> {
        let (fetch, generation, ticket) = {
            let mut state = self.lock();
            let generation = state.generation;
            let pending = match &state.arena.require(key)?.load {
                LoadState::Loaded { .. } => Pending::Loaded,
                LoadState::Loading { ticket } => Pending::Join(*ticket),
                LoadState::Unloaded => Pending::Start,
            };
            match pending {
                Pending::Loaded => {
                    state.arena.set_expanded(key, true)?;
                    return Ok(());
                }
                Pending::Join(ticket) => {
                    let fetch = state.in_flight.get(&key).cloned().ok_or_else(|| {
                        AppError::internal(format!("Node {key} is loading without a fetch"))
                    })?;
                    debug!(%key, ticket, "Joining in-flight fetch");
                    (fetch, generation, ticket)
                }
                Pending::Start => {
                    let request = state.children_request(key)?;
                    let ticket = state.next_ticket;
                    state.next_ticket += 1;

                    debug!(%key, ticket, request = %request, "Fetching children");
                    let provider = Arc::clone(&self.provider);
                    let fetch: SharedFetch =
                        async move { provider.fetch_children(&request).await }
                            .boxed()
                            .shared();

                    state.arena.begin_loading(key, ticket)?;
                    state.in_flight.insert(key, fetch.clone());
                    (fetch, generation, ticket)
                }
            }
        };

        let result = fetch.await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(%key, ticket, "Discarding fetch from a previous hierarchy mode");
            return Err(AppError::stale(
                "Hierarchy mode changed while children were loading",
            ));
        }

        let owns_fetch = matches!(
            state.arena.get(key).map(|n| &n.load),
            Some(LoadState::Loading { ticket: t }) if *t == ticket
        );
        if !owns_fetch {
            // Another caller already applied this fetch, or a refresh
            // replaced the node's children in the meantime.
            return match state.arena.get(key) {
                Some(_) => result.map(|_| ()),
                None => {
                    state.in_flight.remove(&key);
                    debug!(%key, ticket, "Discarding fetch for a removed node");
                    Err(AppError::stale("Node was removed while loading"))
                }
            };
        }

        state.in_flight.remove(&key);
        match result {
            Ok(page) => {
                let count = page.nodes.len();
                state.arena.attach_children(key, page.nodes)?;
                debug!(%key, count, "Children loaded");
                Ok(())
            }
            Err(e) => {
                state.arena.rollback_loading(key)?;
                warn!(%key, error = %e, "Failed to load children");
                Err(e)
            }
        }
    }

    /// Hides the children of `key`. They stay loaded.
    pub fn collapse(&self, key: NodeKey) -> AppResult<()> {
        self.lock().arena.set_expanded(key, false)
    }

    /// Drops the loaded subtree of `key` and fetches its children again.
    pub async fn refresh(&self, key: NodeKey) -> AppResult<()> {
        {
            let mut state = self.lock();
            if !state.arena.require(key)?.is_loading() {
                for removed in state.arena.clear_children(key)? {
                    state.in_flight.remove(&removed);
                }
            }
        }
        self.expand(key).await
    }

    /// Replaces the whole tree with an empty one for `mode`.
    ///
    /// Fetches still running for the previous mode complete with a `Stale`
    /// error and leave the new tree untouched.
    pub fn switch_mode(&self, mode: impl Into<String>, levels: LevelTable) {
        let mut state = self.lock();
        let mode = mode.into();
        info!(from = %state.mode, to = %mode, "Switching hierarchy mode");
        state.generation += 1;
        state.arena = NodeArena::starting_at(state.arena.next_key());
        state.in_flight.clear();
        state.mode = mode;
        state.levels = levels;
    }

    /// Flips the selection of `key`. Returns the node's new state.
    pub fn toggle(&self, key: NodeKey) -> AppResult<Selection> {
        self.lock().arena.toggle(key)
    }

    /// Checks every loaded node.
    pub fn select_all(&self) {
        self.set_all(Selection::Checked);
    }

    /// Unchecks every loaded node.
    pub fn select_none(&self) {
        self.set_all(Selection::Unchecked);
    }

    fn set_all(&self, selection: Selection) {
        let mut state = self.lock();
        let roots = state
            .arena
            .get(NodeKey::ROOT)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        for root in roots {
            state.arena.set_subtree(root, selection);
        }
    }

    /// Snapshot of one node.
    pub fn node(&self, key: NodeKey) -> Option<SelectionNode> {
        if key.is_root() {
            return None;
        }
        self.lock().arena.get(key).cloned()
    }

    /// Keys of the loaded top-level nodes.
    pub fn roots(&self) -> Vec<NodeKey> {
        self.children(NodeKey::ROOT)
    }

    /// Keys of the loaded children of `key`.
    pub fn children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.lock()
            .arena
            .get(key)
            .map(|n| n.children().to_vec())
            .unwrap_or_default()
    }

    /// Finds a loaded node by its slash-joined path.
    pub fn find_by_path(&self, path: &str) -> Option<NodeKey> {
        self.lock().arena.find_by_path(path)
    }

    /// Whether a fetch for `key` is in flight.
    pub fn is_loading(&self, key: NodeKey) -> bool {
        self.lock()
            .arena
            .get(key)
            .is_some_and(SelectionNode::is_loading)
    }

    /// Number of loaded nodes.
    pub fn len(&self) -> usize {
        self.lock().arena.len()
    }

    /// Whether no node has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.lock().arena.is_empty()
    }

    /// Paths of every checked node, in tree order, without depth gating.
    pub fn checked_paths(&self) -> Vec<String> {
        let state = self.lock();
        state
            .arena
            .descendants(NodeKey::ROOT)
            .into_iter()
            .filter_map(|k| state.arena.get(k))
            .filter(|n| n.selection == Selection::Checked)
            .map(|n| n.path.clone())
            .collect()
    }

    /// Paths of checked nodes at or below the minimum level, in tree order.
    pub fn collect_selected_paths(&self) -> Vec<String> {
        let state = self.lock();
        state
            .arena
            .descendants(NodeKey::ROOT)
            .into_iter()
            .filter_map(|k| state.arena.get(k))
            .filter(|n| n.selection == Selection::Checked && n.depth >= self.min_level)
            .map(|n| n.path.clone())
            .collect()
    }

    /// Checked paths that are shallower than the minimum level and not
    /// carried by deeper checked descendants.
    ///
    /// A checked node with loaded children is represented in the result by
    /// those children, so only checked nodes without loaded children are
    /// validated.
    pub fn invalid_selections(&self) -> Vec<String> {
        let state = self.lock();
        let terminal: Vec<&str> = state
            .arena
            .descendants(NodeKey::ROOT)
            .into_iter()
            .filter_map(|k| state.arena.get(k))
            .filter(|n| n.selection == Selection::Checked && n.children().is_empty())
            .map(|n| n.path.as_str())
            .collect();
        validate::validate(&terminal, self.min_level)
    }

    /// Whether the selection holds at least one valid path and no invalid one.
    pub fn can_submit(&self) -> bool {
        !self.collect_selected_paths().is_empty() && self.invalid_selections().is_empty()
    }

    /// Rows for every node reachable through expanded ancestors.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let state = self.lock();
        let mut rows = Vec::new();
        let mut stack: Vec<NodeKey> = state
            .arena
            .get(NodeKey::ROOT)
            .map(|n| n.children().iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(key) = stack.pop() {
            let Some(node) = state.arena.get(key) else {
                continue;
            };
            rows.push(VisibleRow {
                key,
                depth: node.depth,
                name: node.display_name.clone(),
                path: node.path.clone(),
                selection: node.selection,
                expanded: node.is_expanded(),
                loaded: node.is_loaded(),
                too_shallow: node.selection == Selection::Checked
                    && node.depth < self.min_level
                    && node.children().is_empty(),
            });
            if node.is_expanded() {
                stack.extend(node.children().iter().rev().copied());
            }
        }
        rows
    }

    /// Loaded nodes whose state breaks the tri-state rule. Always empty
    /// unless there is a bug; exposed for diagnostics.
    pub fn inconsistent_nodes(&self) -> Vec<NodeKey> {
        self.lock().arena.inconsistent_nodes()
    }
}
