//! Per-identifier decisions, computed before anything on disk changes
//!
//! Two independent questions are answered for every resolved identifier:
//!
//! | Question | Answer | Effect |
//! |----------|--------|--------|
//! | Is the resolved file on disk? | `UpToDate` | nothing |
//! | | `FetchNew` | download and write |
//! | Does the cache agree? | `Consistent` | nothing |
//! | | `ReplaceStale` | delete the previously cached file |
//! | | `Adopt` | new cache entry only |

use super::report::{Failure, Pruned, Stage};
use crate::artifact::{DesiredSet, Filename, Identifier, Snapshot};
use crate::cache::Cache;
use crate::error::ModsyncResult;
use crate::resolver::Resolved;
use serde::Serialize;
use std::collections::HashSet;

/// Whether the resolved file already exists locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    UpToDate,
    FetchNew,
}

/// How the cache entry changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CacheTransition {
    /// Cached filename matches the resolved one
    Consistent,
    /// Cached filename is outdated; `shared` means another identifier now
    /// uses that file, so it must stay on disk
    ReplaceStale { previous: Filename, shared: bool },
    /// No previous entry
    Adopt,
}

/// Planned work for one resolved identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub resolved: Resolved,
    pub presence: Presence,
    pub transition: CacheTransition,
}

impl Action {
    pub fn identifier(&self) -> &Identifier {
        &self.resolved.identifier
    }

    pub fn filename(&self) -> &Filename {
        &self.resolved.filename
    }

    /// True if applying this action changes no file
    pub fn is_noop(&self) -> bool {
        self.presence == Presence::UpToDate && !self.deletes()
    }

    /// True if applying this action removes a stale file
    pub fn deletes(&self) -> bool {
        matches!(
            self.transition,
            CacheTransition::ReplaceStale { shared: false, .. }
        )
    }
}

/// Full plan for a run
#[derive(Debug, Serialize)]
pub struct Plan {
    /// Resolved identifiers in mod list order
    pub actions: Vec<Action>,
    /// Identifiers that could not be resolved
    pub failures: Vec<Failure>,
    /// Cache entries for identifiers no longer listed
    pub pruned: Vec<Pruned>,
    /// Cache as loaded, used to retain entries of failed identifiers
    #[serde(skip)]
    pub previous: Cache,
}

impl Plan {
    /// Build a plan from resolver results, given in mod list order
    pub fn build(
        resolutions: Vec<(Identifier, ModsyncResult<Resolved>)>,
        desired: &DesiredSet,
        cache: &Cache,
        snapshot: &Snapshot,
    ) -> Self {
        let mut resolved = Vec::new();
        let mut failures = Vec::new();
        for (identifier, result) in resolutions {
            match result {
                Ok(r) => resolved.push(r),
                Err(error) => failures.push(Failure {
                    identifier,
                    stage: Stage::Resolve,
                    error,
                }),
            }
        }

        // Files that must survive the run: everything resolved now, plus the
        // cached files of failed identifiers, which keep their entries.
        let live: HashSet<&Filename> = resolved
            .iter()
            .map(|r| &r.filename)
            .chain(failures.iter().filter_map(|f| cache.get(&f.identifier)))
            .collect();

        let actions = resolved
            .iter()
            .map(|r| {
                let presence = if snapshot.contains(&r.filename) {
                    Presence::UpToDate
                } else {
                    Presence::FetchNew
                };

                let transition = match cache.get(&r.identifier) {
                    Some(previous) if *previous == r.filename => CacheTransition::Consistent,
                    Some(previous) => CacheTransition::ReplaceStale {
                        previous: previous.clone(),
                        shared: live.contains(previous),
                    },
                    None => CacheTransition::Adopt,
                };

                Action {
                    resolved: r.clone(),
                    presence,
                    transition,
                }
            })
            .collect();

        let pruned = cache
            .orphans(desired)
            .map(|(identifier, filename)| Pruned {
                identifier: identifier.clone(),
                filename: filename.clone(),
            })
            .collect();

        Self {
            actions,
            failures,
            pruned,
            previous: cache.clone(),
        }
    }

    /// Number of artifacts that will be downloaded
    pub fn downloads(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.presence == Presence::FetchNew)
            .count()
    }

    /// Number of stale artifacts that will be deleted
    pub fn deletions(&self) -> usize {
        self.actions.iter().filter(|a| a.deletes()).count()
    }

    /// True if applying the plan changes nothing on disk
    pub fn is_noop(&self) -> bool {
        self.actions.iter().all(Action::is_noop)
    }
}
