//! Progress events emitted while reconciling
//!
//! The reconciler never prints. Front ends that want progress output pass an
//! observer; everything else uses [`NoopObserver`].

use super::report::{Outcome, Stage};
use crate::artifact::{Filename, Identifier};
use crate::error::ModsyncError;

/// Something that happened to one identifier during a run
#[derive(Debug)]
pub enum SyncEvent<'a> {
    /// Planning is about to resolve this many identifiers
    Planning { total: usize },
    /// Resolver call started
    Resolving { id: &'a Identifier },
    /// Resolver returned a filename
    Resolved {
        id: &'a Identifier,
        filename: &'a Filename,
    },
    /// Content download started
    Downloading {
        id: &'a Identifier,
        filename: &'a Filename,
    },
    /// Artifact written to disk
    Written {
        id: &'a Identifier,
        filename: &'a Filename,
        bytes: usize,
    },
    /// Stale artifact removed
    Deleted {
        id: &'a Identifier,
        filename: &'a Filename,
    },
    /// Identifier dropped from the cache, its file left in place
    Pruned {
        id: &'a Identifier,
        filename: &'a Filename,
    },
    /// Identifier fully reconciled
    Completed { outcome: &'a Outcome },
    /// Identifier failed and keeps its previous state
    Failed {
        id: &'a Identifier,
        stage: Stage,
        error: &'a ModsyncError,
    },
}

/// Receives [`SyncEvent`]s as the reconciler works
pub trait SyncObserver: Send + Sync {
    fn on_event(&self, event: &SyncEvent<'_>);
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {
    fn on_event(&self, _event: &SyncEvent<'_>) {}
}
