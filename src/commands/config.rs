//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use geoface_cache::CacheManager;
use geoface_core::config::AppConfig;
use geoface_core::error::AppError;
use geoface_core::traits::cache::CacheProvider;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show,
    /// Validate the configuration, check the cache and list hierarchy modes
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(config, format, |c| println!("{c:#?}"));
        }
        ConfigCommand::Validate => {
            let modes = config.hierarchy.level_tables()?;
            config.hierarchy.validate()?;
            let cache = CacheManager::new(&config.cache)?;
            let cache_status = if cache.health_check().await? {
                "healthy"
            } else {
                "unreachable"
            };
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv(
                "Cache",
                &format!("{} ({cache_status})", config.cache.provider),
            );
            output::print_kv("Default mode", &config.hierarchy.default_mode);
            output::print_kv("Minimum level", &config.hierarchy.min_level.to_string());
            output::print_kv("Source file", &config.hierarchy.source_file);
            for name in modes.names() {
                let levels = modes.get(name)?.iter().collect::<Vec<_>>().join(" > ");
                output::print_kv(&format!("Mode {name}"), &levels);
            }
        }
    }

    Ok(())
}
