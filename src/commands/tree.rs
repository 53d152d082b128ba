//! Hierarchy selection command.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use futures::future::try_join_all;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use geoface_cache::CacheManager;
use geoface_core::config::AppConfig;
use geoface_core::error::AppError;
use geoface_core::traits::hierarchy::HierarchyProvider;
use geoface_core::types::level::LevelTable;
use geoface_selection::{
    CachedHierarchyProvider, NodeKey, SelectionTree, SelectionTreeConfig, StaticHierarchyProvider,
};

/// Arguments for `tree`
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Hierarchy mode; defaults to the configured mode
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Slash-joined path to toggle, e.g. `Central/Abau`. Repeatable.
    #[arg(short, long = "select")]
    pub select: Vec<String>,

    /// Minimum depth of a submittable selection; defaults to the configured value
    #[arg(long)]
    pub min_level: Option<usize>,
}

/// One selected path
#[derive(Debug, Serialize, Tabled)]
struct SelectionRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Depth")]
    depth: usize,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct SelectionReport {
    mode: String,
    min_level: usize,
    selected: Vec<String>,
    invalid: Vec<String>,
    can_submit: bool,
}

/// Execute `tree`
pub async fn execute(
    args: &TreeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mode = args
        .mode
        .clone()
        .unwrap_or_else(|| config.hierarchy.default_mode.clone());
    let levels = config.hierarchy.level_tables()?.get(&mode)?.clone();
    let min_level = args.min_level.unwrap_or(config.hierarchy.min_level);

    let tree = SelectionTree::new(
        build_provider(config).await?,
        SelectionTreeConfig {
            mode: mode.clone(),
            levels: levels.clone(),
            min_level,
        },
    );
    expand_all(&tree, &levels).await?;
    tracing::info!(mode = %mode, nodes = tree.len(), "Hierarchy loaded");

    for path in &args.select {
        let key = tree
            .find_by_path(path)
            .ok_or_else(|| AppError::not_found(format!("No node at '{path}' in mode {mode}")))?;
        tree.toggle(key)?;
    }

    let report = SelectionReport {
        mode,
        min_level,
        selected: tree.collect_selected_paths(),
        invalid: tree.invalid_selections(),
        can_submit: tree.can_submit(),
    };
    output::print_item(&report, format, print_report);
    Ok(())
}

async fn build_provider(config: &AppConfig) -> Result<Arc<dyn HierarchyProvider>, AppError> {
    let source = StaticHierarchyProvider::load(&config.hierarchy.source_file).await?;
    if !config.hierarchy.cache_children {
        return Ok(Arc::new(source));
    }
    let cache = CacheManager::new(&config.cache)?;
    Ok(Arc::new(CachedHierarchyProvider::new(
        source,
        Arc::new(cache),
        Duration::from_secs(config.cache.default_ttl_seconds),
    )))
}

/// Loads every level, one concurrent batch of fetches per depth.
async fn expand_all(tree: &SelectionTree, levels: &LevelTable) -> Result<(), AppError> {
    tree.load_roots().await?;
    let mut frontier: Vec<NodeKey> = tree.roots();
    while !frontier.is_empty() {
        let expandable: Vec<NodeKey> = frontier
            .into_iter()
            .filter(|k| tree.node(*k).is_some_and(|n| !levels.is_leaf_depth(n.depth)))
            .collect();
        try_join_all(expandable.iter().map(|k| tree.expand(*k))).await?;
        frontier = expandable.iter().flat_map(|k| tree.children(*k)).collect();
    }
    Ok(())
}

fn print_report(report: &SelectionReport) {
    let rows: Vec<SelectionRow> = report
        .selected
        .iter()
        .map(|p| (p, "selected"))
        .chain(report.invalid.iter().map(|p| (p, "too shallow")))
        .map(|(path, status)| SelectionRow {
            path: path.clone(),
            depth: geoface_selection::path_depth(path).unwrap_or(0),
            status,
        })
        .collect();
    output::print_list(&rows, OutputFormat::Table);

    if report.can_submit {
        output::print_success(&format!("{} paths ready to submit", report.selected.len()));
    } else if !report.invalid.is_empty() {
        output::print_warning(&format!(
            "Selections must be at depth {} or deeper",
            report.min_level
        ));
    } else {
        output::print_warning("Nothing selected");
    }
}
