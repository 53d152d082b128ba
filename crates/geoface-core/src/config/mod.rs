//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a default so a missing file still
//! yields a usable configuration.

pub mod cache;
pub mod hierarchy;
pub mod logging;
pub mod path;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::hierarchy::HierarchyConfig;
use self::logging::LoggingConfig;
use self::path::PathConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// configuration (base file + environment overlay + `GEOFACE__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Hierarchy modes and selection rules.
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    /// Folder index settings.
    #[serde(default)]
    pub path: PathConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base file at `path` with an optional environment overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `GEOFACE`, e.g. `GEOFACE__HIERARCHY__MIN_LEVEL=2`.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("GEOFACE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.hierarchy.validate()?;
        Ok(app)
    }
}
