//! Sync command - reconcile the target folder with the mod list

use crate::artifact::{ArtifactStore, DesiredSet};
use crate::cache::CacheStore;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{ModsyncError, ModsyncResult};
use crate::reconcile::{NoopObserver, Plan, ReconcileOptions, Reconciler, Report, SyncObserver};
use crate::resolver::{HttpResolver, Resolver};
use crate::ui::{self, SyncProgress, UiContext};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Execute the sync command
pub async fn execute(
    target: &Path,
    dry_run: bool,
    format: OutputFormat,
    config: &Config,
) -> ModsyncResult<()> {
    if !target.is_dir() {
        return Err(ModsyncError::MissingTargetDirectory(target.to_path_buf()));
    }

    // Everything local is read before the first request goes out
    let desired = DesiredSet::read(&target.join(&config.layout.list_file)).await?;
    let cache_store = CacheStore::new(target.join(&config.layout.cache_file));
    let cache = cache_store.load().await?;
    let store = ArtifactStore::new(target, config.layout.extension.as_str());
    let snapshot = store.snapshot().await?;

    let ctx = UiContext::detect();
    let text = format == OutputFormat::Text;
    if text {
        ui::header(&ctx, target, desired.len(), cache.len(), snapshot.len());
        for line in desired.rejected() {
            ui::rejected_line(&ctx, line);
        }
    }

    let resolver = HttpResolver::new(&config.remote);
    debug!("Using provider {}", resolver.name());

    let progress = text.then(|| SyncProgress::new(&ctx));
    let noop = NoopObserver;
    let observer: &dyn SyncObserver = match &progress {
        Some(progress) => progress,
        None => &noop,
    };

    let reconciler = Reconciler::new(&resolver)
        .with_options(ReconcileOptions {
            concurrency: config.remote.concurrency,
            timeout: Duration::from_secs(config.remote.timeout_secs),
        })
        .with_observer(observer);

    let plan = reconciler.plan(&desired, &cache, &snapshot).await;

    if dry_run {
        if let Some(progress) = &progress {
            progress.finish();
        }
        match format {
            OutputFormat::Json => print_json(&plan)?,
            OutputFormat::Text => print_plan(&ctx, &plan, desired.rejected().len()),
        }
        return completion(
            plan.failures.len() + desired.rejected().len(),
            plan.actions.len() + plan.failures.len() + desired.rejected().len(),
        );
    }

    let report = reconciler.apply(plan, &store).await;
    if let Some(progress) = &progress {
        progress.finish();
    }

    cache_store.save(&report.cache).await?;
    info!("Cache saved with {} entries", report.cache.len());

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_report(&ctx, &report, desired.rejected().len()),
    }

    completion(
        report.failures.len() + desired.rejected().len(),
        report.total() + desired.rejected().len(),
    )
}

/// A run with any failed or unusable entry ends in `SyncIncomplete`
fn completion(failed: usize, total: usize) -> ModsyncResult<()> {
    if failed == 0 {
        Ok(())
    } else {
        Err(ModsyncError::SyncIncomplete { failed, total })
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ModsyncResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_plan(ctx: &UiContext, plan: &Plan, rejected: usize) {
    for action in &plan.actions {
        ui::planned_line(ctx, action);
    }
    for failure in &plan.failures {
        ui::failure_line(ctx, failure);
    }
    ui::pruned_lines(ctx, &plan.pruned);

    let unchanged = plan.actions.iter().filter(|a| a.is_noop()).count();
    let text = format!(
        "Dry run: {} to download, {} to remove, {} unchanged",
        plan.downloads(),
        plan.deletions(),
        unchanged
    );
    ui::summary(ctx, &text, plan.failures.len() + rejected);
}

fn print_report(ctx: &UiContext, report: &Report, rejected: usize) {
    for outcome in &report.outcomes {
        ui::outcome_line(ctx, outcome);
    }
    for failure in &report.failures {
        ui::failure_line(ctx, failure);
    }
    ui::pruned_lines(ctx, &report.pruned);

    let unchanged = report.outcomes.iter().filter(|o| !o.changed()).count();
    let text = format!(
        "{} up to date, {} downloaded, {} removed",
        unchanged,
        report.written(),
        report.deleted()
    );
    ui::summary(ctx, &text, report.failures.len() + rejected);
}
