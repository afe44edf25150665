//! Progress indicators with CI fallback

use super::context::UiContext;
use crate::reconcile::{Stage, SyncEvent, SyncObserver};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a sync run.
///
/// Counts resolved mods while planning and shows the current download while
/// applying. In CI it prints one plain line per download instead.
pub struct SyncProgress {
    bar: Option<ProgressBar>,
}

impl SyncProgress {
    /// Create a new progress indicator
    pub fn new(ctx: &UiContext) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {spinner:.green} Resolving  {bar:20.green/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                    .progress_chars("━╸─"),
            );
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

impl SyncObserver for SyncProgress {
    fn on_event(&self, event: &SyncEvent<'_>) {
        match (event, &self.bar) {
            (SyncEvent::Planning { total }, Some(bar)) => bar.set_length(*total as u64),
            (SyncEvent::Resolving { id }, Some(bar)) => bar.set_message(id.to_string()),
            (SyncEvent::Resolved { .. }, Some(bar)) => bar.inc(1),
            (
                SyncEvent::Failed {
                    stage: Stage::Resolve,
                    ..
                },
                Some(bar),
            ) => bar.inc(1),
            (SyncEvent::Downloading { filename, .. }, Some(bar)) => {
                bar.set_message(format!("downloading {}", filename))
            }
            (SyncEvent::Downloading { filename, .. }, None) => {
                println!("{} Downloading {}", style("...").dim(), filename)
            }
            _ => {}
        }
    }
}
