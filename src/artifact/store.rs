//! Artifact files in the target directory
//!
//! Writes go to a hidden `.part` file first and are renamed into place, so an
//! interrupted download never leaves a truncated jar under its real name.

use super::types::Filename;
use crate::error::{ModsyncError, ModsyncResult};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Artifact filenames present on disk at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeSet<Filename>,
}

impl Snapshot {
    pub fn new(files: impl IntoIterator<Item = Filename>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    pub fn contains(&self, name: &Filename) -> bool {
        self.files.contains(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Reads, writes and deletes artifacts in one directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    extension: String,
}

impl ArtifactStore {
    /// Create a store over `dir`, tracking files ending in `.{extension}`
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Full path of an artifact
    pub fn path(&self, name: &Filename) -> PathBuf {
        self.dir.join(name.as_str())
    }

    /// List the artifact files currently in the directory
    pub async fn snapshot(&self) -> ModsyncResult<Snapshot> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            ModsyncError::io(format!("reading directory {}", self.dir.display()), e)
        })?;

        let mut files = BTreeSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ModsyncError::io("reading directory entry", e))?
        {
            // Follows symlinks; a dangling link is not an artifact
            let is_file = fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };

            if let Ok(name) = Filename::new(name) {
                if name.has_extension(&self.extension) {
                    files.insert(name);
                }
            }
        }

        debug!("Found {} artifacts in {}", files.len(), self.dir.display());
        Ok(Snapshot { files })
    }

    /// Create or overwrite an artifact with the given content
    pub async fn write(&self, name: &Filename, content: &[u8]) -> ModsyncResult<()> {
        let path = self.path(name);
        let partial = self.dir.join(format!(".{}.part", name));

        if let Err(source) = write_then_rename(&partial, &path, content).await {
            let _ = fs::remove_file(&partial).await;
            return Err(ModsyncError::ArtifactWrite { path, source });
        }

        debug!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    /// Remove an artifact. Returns `false` if it was already gone.
    pub async fn delete(&self, name: &Filename) -> ModsyncResult<bool> {
        let path = self.path(name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ModsyncError::ArtifactDelete { path, source }),
        }
    }
}

async fn write_then_rename(partial: &Path, path: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(partial, content).await?;
    fs::rename(partial, path).await
}
