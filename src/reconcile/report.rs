//! Results of a reconciliation run

use super::plan::{CacheTransition, Presence};
use crate::artifact::{Filename, Identifier};
use crate::cache::Cache;
use crate::error::ModsyncError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Step at which an identifier failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Resolve,
    Fetch,
    Write,
    Delete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resolve => "resolve",
            Self::Fetch => "fetch",
            Self::Write => "write",
            Self::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// An identifier that could not be reconciled this run
#[derive(Debug, Serialize)]
pub struct Failure {
    pub identifier: Identifier,
    pub stage: Stage,
    #[serde(serialize_with = "serialize_display")]
    pub error: ModsyncError,
}

/// An identifier dropped from the cache because it left the mod list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pruned {
    pub identifier: Identifier,
    /// File left on disk
    pub filename: Filename,
}

/// What happened to one successfully reconciled identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub identifier: Identifier,
    pub filename: Filename,
    pub presence: Presence,
    pub transition: CacheTransition,
    /// Content was downloaded and written
    pub fetched: bool,
    /// A stale file was removed
    pub deleted: bool,
}

impl Outcome {
    /// Short description of the transition for display
    pub fn label(&self) -> &'static str {
        match (&self.transition, self.presence) {
            (CacheTransition::ReplaceStale { .. }, _) => "updated",
            (_, Presence::FetchNew) => "downloaded",
            (CacheTransition::Adopt, Presence::UpToDate) => "adopted",
            (CacheTransition::Consistent, Presence::UpToDate) => "up to date",
        }
    }

    /// Whether the run touched the filesystem for this identifier
    pub fn changed(&self) -> bool {
        self.fetched || self.deleted
    }
}

/// Everything a run did, plus the cache to persist
#[derive(Debug, Serialize)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
    pub failures: Vec<Failure>,
    pub pruned: Vec<Pruned>,
    pub cache: Cache,
}

impl Report {
    /// Number of artifacts written
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.fetched).count()
    }

    /// Number of stale artifacts deleted
    pub fn deleted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.deleted).count()
    }

    /// Identifiers processed, successful or not
    pub fn total(&self) -> usize {
        self.outcomes.len() + self.failures.len()
    }

    /// True when every identifier was reconciled
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}
