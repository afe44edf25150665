//! Persisted identifier to filename cache
//!
//! The cache records which file each mod resolved to on the previous run. It
//! is the only state modsync keeps between runs and is what lets a renamed
//! upstream file be recognised as stale.
//!
//! # Lifecycle
//!
//! | Step | Owner | Description |
//! |------|-------|-------------|
//! | load | runner | Read `.cache.json`, empty if absent |
//! | rebuild | reconciler | New cache built in memory from the run's outcomes |
//! | save | runner | Whole record overwritten once at the end |

pub mod store;

pub use store::CacheStore;

use crate::artifact::{DesiredSet, Filename, Identifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier to last-known filename mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cache {
    entries: BTreeMap<Identifier, Filename>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &Identifier) -> Option<&Filename> {
        self.entries.get(id)
    }

    /// Set the entry for `id`, returning the previous filename
    pub fn insert(&mut self, id: Identifier, name: Filename) -> Option<Filename> {
        self.entries.insert(id, name)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose identifier is no longer desired
    pub fn orphans<'a>(
        &'a self,
        desired: &'a DesiredSet,
    ) -> impl Iterator<Item = (&'a Identifier, &'a Filename)> + 'a {
        self.entries.iter().filter(|(id, _)| !desired.contains(id))
    }
}

impl FromIterator<(Identifier, Filename)> for Cache {
    fn from_iter<T: IntoIterator<Item = (Identifier, Filename)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
