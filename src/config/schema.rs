//! Configuration schema for modsync
//!
//! Configuration is stored at `~/.config/modsync/config.toml`

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote provider settings
    pub remote: RemoteConfig,

    /// Target directory layout
    pub layout: LayoutConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Remote provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// "Latest file" endpoint, `{id}` is replaced by the mod identifier
    pub endpoint: String,

    /// Timeout for a single request in seconds
    pub timeout_secs: u64,

    /// Maximum redirects followed while resolving
    pub max_redirects: u32,

    /// Number of mods resolved in parallel
    pub concurrency: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Largest artifact accepted, in MiB
    pub max_artifact_mb: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://minecraft.curseforge.com/projects/{id}/files/latest".to_string(),
            timeout_secs: 30,
            max_redirects: 10,
            concurrency: 4,
            user_agent: format!("modsync/{}", env!("CARGO_PKG_VERSION")),
            max_artifact_mb: 512,
        }
    }
}

/// File names inside the target directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Mod list, one identifier per line
    pub list_file: String,

    /// Persisted identifier to filename cache
    pub cache_file: String,

    /// Extension of tracked artifacts (without the dot)
    pub extension: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            list_file: ".mods.txt".to_string(),
            cache_file: ".cache.json".to_string(),
            extension: "jar".to_string(),
        }
    }
}
