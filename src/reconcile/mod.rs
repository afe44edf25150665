//! Reconciliation of the mods folder against the remote provider
//!
//! A run has two phases:
//!
//! 1. **Plan**: resolve every listed identifier (in parallel, bounded) and
//!    decide per identifier whether to download and whether a stale file must
//!    go. Nothing on disk changes.
//! 2. **Apply**: execute the plan one identifier at a time, then rebuild the
//!    cache from the outcomes.
//!
//! # Guarantees
//!
//! - A failure for one identifier never aborts the others; the failed
//!   identifier keeps its previous cache entry and files.
//! - New files are written before stale ones are deleted.
//! - Identifiers removed from the mod list are pruned from the cache only;
//!   their files stay on disk and are reported as [`Pruned`].
//! - Running twice with unchanged remote answers changes nothing the second
//!   time.

mod apply;
pub mod observer;
pub mod plan;
pub mod report;

pub use observer::{NoopObserver, SyncEvent, SyncObserver};
pub use plan::{Action, CacheTransition, Plan, Presence};
pub use report::{Failure, Outcome, Pruned, Report, Stage};

use crate::artifact::{ArtifactStore, DesiredSet, Identifier, Snapshot};
use crate::cache::Cache;
use crate::error::{ModsyncError, ModsyncResult};
use crate::resolver::{Resolved, Resolver};
use futures_util::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tuning knobs for a run
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Resolver calls in flight at once
    pub concurrency: usize,
    /// Upper bound for a single resolver call
    pub timeout: Duration,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Drives planning and applying for one run
pub struct Reconciler<'a> {
    resolver: &'a dyn Resolver,
    observer: &'a dyn SyncObserver,
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(resolver: &'a dyn Resolver) -> Self {
        Self {
            resolver,
            observer: &NoopObserver,
            options: ReconcileOptions::default(),
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn SyncObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve every desired identifier and decide what to do with it
    pub async fn plan(&self, desired: &DesiredSet, cache: &Cache, snapshot: &Snapshot) -> Plan {
        self.observer.on_event(&SyncEvent::Planning {
            total: desired.len(),
        });

        let resolutions: Vec<(Identifier, ModsyncResult<Resolved>)> =
            stream::iter(desired.iter().cloned())
                .map(|id| async move {
                    let result = self.resolve_one(&id).await;
                    (id, result)
                })
                .buffered(self.options.concurrency.max(1))
                .collect()
                .await;

        let plan = Plan::build(resolutions, desired, cache, snapshot);

        for failure in &plan.failures {
            warn!("{}", failure.error);
            self.observer.on_event(&SyncEvent::Failed {
                id: &failure.identifier,
                stage: failure.stage,
                error: &failure.error,
            });
        }
        for pruned in &plan.pruned {
            info!(
                "{} is no longer listed, dropping it from the cache (leaving {})",
                pruned.identifier, pruned.filename
            );
            self.observer.on_event(&SyncEvent::Pruned {
                id: &pruned.identifier,
                filename: &pruned.filename,
            });
        }

        debug!(
            "Plan: {} downloads, {} deletions, {} failures, {} pruned",
            plan.downloads(),
            plan.deletions(),
            plan.failures.len(),
            plan.pruned.len()
        );
        plan
    }

    /// Plan and apply in one go
    pub async fn run(
        &self,
        desired: &DesiredSet,
        cache: &Cache,
        store: &ArtifactStore,
    ) -> ModsyncResult<Report> {
        let snapshot = store.snapshot().await?;
        let plan = self.plan(desired, cache, &snapshot).await;
        Ok(self.apply(plan, store).await)
    }

    async fn resolve_one(&self, id: &Identifier) -> ModsyncResult<Resolved> {
        self.observer.on_event(&SyncEvent::Resolving { id });

        let resolved = tokio::time::timeout(self.options.timeout, self.resolver.resolve(id))
            .await
            .map_err(|_| self.timed_out(id))??;

        self.observer.on_event(&SyncEvent::Resolved {
            id,
            filename: &resolved.filename,
        });
        Ok(resolved)
    }

    async fn fetch_one(&self, resolved: &Resolved) -> ModsyncResult<Vec<u8>> {
        tokio::time::timeout(self.options.timeout, self.resolver.fetch(resolved))
            .await
            .map_err(|_| self.timed_out(&resolved.identifier))?
    }

    fn timed_out(&self, id: &Identifier) -> ModsyncError {
        ModsyncError::resolution(
            id.as_str(),
            format!("no answer within {:?}", self.options.timeout),
        )
    }
}
