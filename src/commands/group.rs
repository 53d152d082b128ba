//! Folder grouping command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::io::AsyncReadExt;

use crate::output::{self, OutputFormat};
use geoface_core::error::AppError;
use geoface_path::grouping::FolderGrouping;

/// Arguments for `group`
#[derive(Debug, Args)]
pub struct GroupArgs {
    /// File with one identifier per line; stdin when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// One folder row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Subfolders")]
    subfolders: usize,
}

/// Execute `group`
pub async fn execute(args: &GroupArgs, format: OutputFormat) -> Result<(), AppError> {
    let input = match &args.file {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::storage(format!("Failed to read '{}': {e}", path.display()))
        })?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .map_err(|e| AppError::storage(format!("Failed to read stdin: {e}")))?;
            buf
        }
    };

    let ids = input.lines().map(str::trim).filter(|l| !l.is_empty());
    let map = FolderGrouping::group_by_folder(ids);
    tracing::debug!(folders = map.len(), items = map.total_items(), "Grouped identifiers");

    let rows: Vec<FolderRow> = map
        .iter()
        .map(|(key, node)| FolderRow {
            key: if key.is_empty() { "(root)".to_string() } else { key.to_string() },
            path: format!("/{}", node.display_path),
            items: node.items.len(),
            subfolders: node.child_keys.len(),
        })
        .collect();
    output::print_list(&rows, format);

    if map.skipped > 0 && format == OutputFormat::Table {
        output::print_warning(&format!("{} malformed identifiers skipped", map.skipped));
    }
    Ok(())
}
