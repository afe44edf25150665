//! Configuration management for modsync

pub mod schema;

pub use schema::Config;

use crate::error::{ModsyncError, ModsyncResult};
use crate::resolver::http::ID_PLACEHOLDER;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modsync")
            .join("config.toml")
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> ModsyncResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        let config = self.load_from_file(&self.config_path).await?;
        debug!("Loaded config from {}", self.config_path.display());
        Ok(config)
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> ModsyncResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ModsyncError::io(format!("reading config from {}", path.display()), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| ModsyncError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::validate(&config).map_err(|reason| ModsyncError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        })?;

        Ok(config)
    }

    /// Check values serde cannot express constraints for
    pub fn validate(config: &Config) -> Result<(), String> {
        if !config.remote.endpoint.contains(ID_PLACEHOLDER) {
            return Err(format!(
                "remote.endpoint must contain the {} placeholder",
                ID_PLACEHOLDER
            ));
        }
        if config.remote.timeout_secs == 0 {
            return Err("remote.timeout_secs must be greater than zero".to_string());
        }
        if config.layout.extension.is_empty() || config.layout.extension.starts_with('.') {
            return Err("layout.extension must be a bare extension such as \"jar\"".to_string());
        }
        Ok(())
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> ModsyncResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            ModsyncError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> ModsyncResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ModsyncError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
