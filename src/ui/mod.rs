//! Terminal output for sync runs
//!
//! Uses `cliclack` log lines and an `indicatif` progress bar in interactive
//! terminals, with automatic fallback to tagged plain lines in CI and pipes.
//!
//! # Example
//!
//! ```rust,ignore
//! use modsync::ui::{self, UiContext, SyncProgress};
//!
//! let ctx = UiContext::detect();
//! ui::header(&ctx, &target, desired.len(), cache.len(), snapshot.len());
//!
//! let progress = SyncProgress::new(&ctx);
//! let report = reconciler.with_observer(&progress).run(&desired, &cache, &store).await?;
//! progress.finish();
//!
//! for outcome in &report.outcomes {
//!     ui::outcome_line(&ctx, outcome);
//! }
//! ui::summary(&ctx, "all mods up to date", report.failures.len());
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    config_exists, config_written, failure_line, header, outcome_line, planned_line,
    pruned_lines, rejected_line, summary,
};
pub use progress::SyncProgress;
