//! The desired set of identifiers, read from the mod list file
//!
//! One identifier per line. Blank lines and lines starting with `[` (section
//! markers such as `[client]`) are skipped. A line that is not a valid
//! identifier is set aside as rejected so the rest of the list still syncs.

use super::types::Identifier;
use crate::error::{ModsyncError, ModsyncResult};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Ordered, duplicate-free list of identifiers to keep in sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredSet {
    ids: Vec<Identifier>,
    rejected: Vec<String>,
}

impl DesiredSet {
    /// Build from identifiers, keeping the first occurrence of each
    pub fn new(ids: impl IntoIterator<Item = Identifier>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for id in ids {
            if seen.insert(id.clone()) {
                unique.push(id);
            } else {
                warn!("Duplicate entry {} in mod list, ignoring", id);
            }
        }
        Self {
            ids: unique,
            rejected: Vec::new(),
        }
    }

    /// Parse the contents of a mod list file
    pub fn parse(content: &str) -> Self {
        let mut ids = Vec::new();
        let mut rejected = Vec::new();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('[') {
                continue;
            }
            match Identifier::new(line) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    warn!("Skipping mod list entry: {}", e);
                    rejected.push(line.to_string());
                }
            }
        }

        Self {
            rejected,
            ..Self::new(ids)
        }
    }

    /// Read and parse a mod list file
    pub async fn read(path: &Path) -> ModsyncResult<Self> {
        if !path.is_file() {
            return Err(ModsyncError::MissingDesiredList(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ModsyncError::io(format!("reading mod list {}", path.display()), e))?;

        let set = Self::parse(&content);
        debug!("Read {} mods from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Lines that could not be used as identifiers, in file order
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}
