//! Executing a plan against the artifact store

use super::{
    Action, CacheTransition, Failure, Outcome, Plan, Presence, Reconciler, Report, Stage,
    SyncEvent,
};
use crate::artifact::ArtifactStore;
use crate::cache::Cache;
use crate::error::ModsyncError;
use tracing::{debug, info, warn};

impl Reconciler<'_> {
    /// Apply a plan one identifier at a time and rebuild the cache
    ///
    /// Failed identifiers, whether they failed while resolving or here, keep
    /// the entry they had in the previous cache.
    pub async fn apply(&self, plan: Plan, store: &ArtifactStore) -> Report {
        let Plan {
            actions,
            mut failures,
            pruned,
            previous,
        } = plan;

        let mut outcomes = Vec::with_capacity(actions.len());
        for action in actions {
            match self.apply_one(&action, store).await {
                Ok(outcome) => {
                    self.observer
                        .on_event(&SyncEvent::Completed { outcome: &outcome });
                    outcomes.push(outcome);
                }
                Err((stage, error)) => {
                    warn!("{}", error);
                    self.observer.on_event(&SyncEvent::Failed {
                        id: action.identifier(),
                        stage,
                        error: &error,
                    });
                    failures.push(Failure {
                        identifier: action.resolved.identifier,
                        stage,
                        error,
                    });
                }
            }
        }

        let cache = rebuild_cache(&outcomes, &failures, &previous);
        Report {
            outcomes,
            failures,
            pruned,
            cache,
        }
    }

    async fn apply_one(
        &self,
        action: &Action,
        store: &ArtifactStore,
    ) -> Result<Outcome, (Stage, ModsyncError)> {
        let id = action.identifier();
        let filename = action.filename();

        let fetched = match action.presence {
            Presence::UpToDate => {
                debug!("{} already present", filename);
                false
            }
            Presence::FetchNew => {
                if !filename.has_extension(store.extension()) {
                    warn!(
                        "{} resolved to {}, which lacks .{} and will be downloaded on every run",
                        id,
                        filename,
                        store.extension()
                    );
                }

                self.observer
                    .on_event(&SyncEvent::Downloading { id, filename });
                let content = self
                    .fetch_one(&action.resolved)
                    .await
                    .map_err(|e| (Stage::Fetch, e))?;
                store
                    .write(filename, &content)
                    .await
                    .map_err(|e| (Stage::Write, e))?;

                info!("Saved {} for {}", filename, id);
                self.observer.on_event(&SyncEvent::Written {
                    id,
                    filename,
                    bytes: content.len(),
                });
                true
            }
        };

        let deleted = match &action.transition {
            CacheTransition::ReplaceStale {
                previous,
                shared: false,
            } => {
                let deleted = store
                    .delete(previous)
                    .await
                    .map_err(|e| (Stage::Delete, e))?;
                if deleted {
                    info!("Deleted stale {} for {}", previous, id);
                    self.observer.on_event(&SyncEvent::Deleted {
                        id,
                        filename: previous,
                    });
                } else {
                    debug!("Stale {} for {} was already gone", previous, id);
                }
                deleted
            }
            CacheTransition::ReplaceStale {
                previous,
                shared: true,
            } => {
                debug!("Keeping {}, another mod resolves to it", previous);
                false
            }
            CacheTransition::Consistent | CacheTransition::Adopt => false,
        };

        Ok(Outcome {
            identifier: id.clone(),
            filename: filename.clone(),
            presence: action.presence,
            transition: action.transition.clone(),
            fetched,
            deleted,
        })
    }
}

/// New cache: resolved filenames for successes, previous entries for failures.
/// Identifiers in neither list (no longer desired) are left out.
fn rebuild_cache(outcomes: &[Outcome], failures: &[Failure], previous: &Cache) -> Cache {
    let retained = failures.iter().filter_map(|f| {
        previous
            .get(&f.identifier)
            .map(|name| (f.identifier.clone(), name.clone()))
    });

    outcomes
        .iter()
        .map(|o| (o.identifier.clone(), o.filename.clone()))
        .chain(retained)
        .collect()
}
