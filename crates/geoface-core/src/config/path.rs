//! Folder index configuration.

use serde::{Deserialize, Serialize};

/// Settings for caching grouped folder maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// How long a grouped folder map stays cached, in seconds.
    #[serde(default = "default_index_ttl")]
    pub index_ttl_seconds: u64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            index_ttl_seconds: default_index_ttl(),
        }
    }
}

fn default_index_ttl() -> u64 {
    600
}
