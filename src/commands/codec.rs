//! Flat identifier commands.

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use geoface_core::error::AppError;
use geoface_path::codec::{PathCodec, StructuredPath};

/// Arguments for `encode`
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Path segments, last one being the file name
    #[arg(required = true)]
    pub segments: Vec<String>,
}

/// Arguments for `decode`
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Flat identifier
    pub id: String,
}

/// Arguments for `label`
#[derive(Debug, Args)]
pub struct LabelArgs {
    /// Flat identifier
    pub id: String,
}

#[derive(Debug, Serialize)]
struct Encoded<'a> {
    path: String,
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct Decoded<'a> {
    id: &'a str,
    segments: &'a [String],
    folder_prefix: String,
    display_name: String,
}

/// Execute `encode`
pub fn encode(args: &EncodeArgs, format: OutputFormat) -> Result<(), AppError> {
    let path = StructuredPath::new(args.segments.iter().cloned())?;
    let id = PathCodec::encode(&path);
    if format == OutputFormat::Table && !PathCodec::is_valid_flat_identifier(&id) {
        output::print_warning("Identifier contains characters outside [A-Za-z0-9_.:%-]");
    }
    output::print_item(
        &Encoded {
            path: path.to_string(),
            id: &id,
        },
        format,
        |e| println!("{}", e.id),
    );
    Ok(())
}

/// Execute `decode`
pub fn decode(args: &DecodeArgs, format: OutputFormat) -> Result<(), AppError> {
    let path = PathCodec::decode(&args.id)
        .ok_or_else(|| AppError::validation(format!("'{}' is not a flat identifier", args.id)))?;
    let decoded = Decoded {
        id: &args.id,
        segments: path.segments(),
        folder_prefix: PathCodec::extract_folder_prefix(&args.id),
        display_name: PathCodec::extract_leaf_display_name(&args.id),
    };
    output::print_item(&decoded, format, |d| {
        output::print_kv("Path", &path.to_string());
        output::print_kv("Folder prefix", &d.folder_prefix);
        output::print_kv("Leaf", path.leaf());
        output::print_kv("Display name", &d.display_name);
    });
    Ok(())
}

/// Execute `label`
pub fn label(args: &LabelArgs, format: OutputFormat) -> Result<(), AppError> {
    let name = PathCodec::extract_leaf_display_name(&args.id);
    output::print_item(&name, format, |n| println!("{n}"));
    Ok(())
}
