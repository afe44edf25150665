//! Loading and saving the cache record

use super::Cache;
use crate::error::{ModsyncError, ModsyncResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// JSON file holding the cache between runs
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cache, or an empty one if no record exists yet
    pub async fn load(&self) -> ModsyncResult<Cache> {
        if !self.path.exists() {
            debug!("No cache at {}, starting empty", self.path.display());
            return Ok(Cache::new());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            ModsyncError::io(format!("reading cache file {}", self.path.display()), e)
        })?;

        let cache: Cache =
            serde_json::from_str(&content).map_err(|e| ModsyncError::CacheCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!("Loaded {} cache entries", cache.len());
        Ok(cache)
    }

    /// Overwrite the record with `cache`
    ///
    /// The new content is written beside the record and renamed over it, so
    /// the previous record survives a crash mid-write.
    pub async fn save(&self, cache: &Cache) -> ModsyncResult<()> {
        let content = to_pretty_json(cache)?;
        let tmp = self.tmp_path();

        fs::write(&tmp, content)
            .await
            .map_err(|e| ModsyncError::io(format!("writing cache file {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            ModsyncError::io(format!("replacing cache file {}", self.path.display()), e)
        })?;

        debug!("Saved {} cache entries to {}", cache.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Pretty JSON with four-space indentation, readable by hand
fn to_pretty_json(cache: &Cache) -> ModsyncResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    cache.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| ModsyncError::Internal(e.to_string()))
}
