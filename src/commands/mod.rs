//! CLI command definitions and dispatch.

pub mod codec;
pub mod config;
pub mod group;
pub mod tree;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use geoface_core::config::AppConfig;
use geoface_core::error::AppError;

/// Geoface: location path codec and hierarchy selection tools
#[derive(Debug, Parser)]
#[command(name = "geoface", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Encode path segments into a flat identifier
    Encode(codec::EncodeArgs),
    /// Decode a flat identifier into path segments
    Decode(codec::DecodeArgs),
    /// Print the readable label of a flat identifier
    Label(codec::LabelArgs),
    /// Group flat identifiers into folders
    Group(group::GroupArgs),
    /// Load a hierarchy, select paths and validate the selection
    Tree(tree::TreeArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Encode(args) => codec::encode(args, self.format),
            Commands::Decode(args) => codec::decode(args, self.format),
            Commands::Label(args) => codec::label(args, self.format),
            Commands::Group(args) => group::execute(args, self.format).await,
            Commands::Tree(args) => tree::execute(args, config, self.format).await,
            Commands::Config(args) => {
                config::execute(args, &self.config, config, self.format).await
            }
        }
    }
}
