//! Error types for modsync
//!
//! All modules use `ModsyncResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modsync operations
pub type ModsyncResult<T> = Result<T, ModsyncError>;

/// All errors that can occur in modsync
#[derive(Error, Debug)]
pub enum ModsyncError {
    // Startup errors
    #[error("Target directory not found: {0}")]
    MissingTargetDirectory(PathBuf),

    #[error("Mod list not found: {0}")]
    MissingDesiredList(PathBuf),

    // Cache errors
    #[error("Cache file {path} is corrupt: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    // Per-identifier errors
    #[error("Failed to resolve {identifier}: {reason}")]
    Resolution { identifier: String, reason: String },

    #[error("Failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete artifact {path}: {source}")]
    ArtifactDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} mods could not be synced")]
    SyncIncomplete { failed: usize, total: usize },

    // Validation errors
    #[error("Invalid identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("Invalid filename {value:?}: {reason}")]
    InvalidFilename { value: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid value for {flag}: {reason}")]
    InvalidOption { flag: &'static str, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ModsyncError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a resolution error for an identifier
    pub fn resolution(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingTargetDirectory(_) => {
                Some("Pass the path of your .minecraft/mods folder")
            }
            Self::MissingDesiredList(_) => {
                Some("Create .mods.txt in the target folder with one project slug per line")
            }
            Self::CacheCorrupt { .. } => {
                Some("Fix or delete the cache file; it is rebuilt on the next run")
            }
            Self::SyncIncomplete { .. } => Some("Re-run modsync to retry the failed mods"),
            Self::InvalidOption { flag: "--endpoint", .. } => {
                Some("The endpoint may also come from MODSYNC_ENDPOINT; it must contain {id}")
            }
            _ => None,
        }
    }
}
