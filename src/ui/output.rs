//! Lines printed for a sync run
//!
//! Every line has a tone. Rich terminals get cliclack log lines, everything
//! else gets a `[OK]`/`[WARN]`/`[FAIL]`/`[INFO]` tag so CI logs stay greppable.

use super::context::UiContext;
use crate::reconcile::{Action, CacheTransition, Failure, Outcome, Presence, Pruned};
use console::style;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Ok,
    Warn,
    Fail,
    Info,
}

fn emit(ctx: &UiContext, tone: Tone, text: &str) {
    if ctx.use_fancy_output() {
        let _ = match tone {
            Tone::Ok => cliclack::log::success(text),
            Tone::Warn => cliclack::log::warning(text),
            Tone::Fail => cliclack::log::error(text),
            Tone::Info => cliclack::log::info(text),
        };
        return;
    }

    let tag = match tone {
        Tone::Ok => style("[OK]").green(),
        Tone::Warn => style("[WARN]").yellow(),
        Tone::Fail => style("[FAIL]").red(),
        Tone::Info => style("[INFO]").cyan(),
    };
    println!("  {} {}", tag, text);
}

/// Target folder and what was found locally before any request
pub fn header(ctx: &UiContext, target: &Path, listed: usize, cached: usize, on_disk: usize) {
    let title = style("modsync").green().bold();
    let counts = format!("{} listed, {} cached, {} on disk", listed, cached, on_disk);

    if ctx.use_fancy_output() {
        let _ = cliclack::intro(title);
        let _ = cliclack::log::remark(format!("{}  {}", target.display(), style(counts).dim()));
    } else {
        println!("{} {}", title, target.display());
        println!("  {}", counts);
    }
}

/// A dry-run line for an action that would touch the folder
pub fn planned_line(ctx: &UiContext, action: &Action) {
    if let Some(line) = describe_action(action) {
        emit(ctx, Tone::Info, &line);
    }
}

/// A line for an identifier whose files changed
pub fn outcome_line(ctx: &UiContext, outcome: &Outcome) {
    if let Some(line) = describe_outcome(outcome) {
        emit(ctx, Tone::Ok, &line);
    }
}

pub fn failure_line(ctx: &UiContext, failure: &Failure) {
    emit(
        ctx,
        Tone::Fail,
        &format!("{} ({}): {}", failure.identifier, failure.stage, failure.error),
    );
}

/// A mod list line that is not a usable project slug
pub fn rejected_line(ctx: &UiContext, line: &str) {
    emit(ctx, Tone::Warn, &format!("{:?} in the mod list is not a project slug, skipped", line));
}

/// Unlisted mods dropped from the cache, plus a reminder that their files remain
pub fn pruned_lines(ctx: &UiContext, pruned: &[Pruned]) {
    for entry in pruned {
        emit(
            ctx,
            Tone::Warn,
            &format!("{} is no longer listed, {} was left on disk", entry.identifier, entry.filename),
        );
    }
    if pruned.is_empty() {
        return;
    }

    let reminder = "Delete unlisted mod files by hand if you no longer want them";
    if ctx.use_fancy_output() {
        let _ = cliclack::log::remark(reminder);
    } else {
        println!("  {}", style(reminder).dim());
    }
}

/// Closing line; turns into a warning when anything failed
pub fn summary(ctx: &UiContext, text: &str, failed: usize) {
    let (text, tag) = if failed == 0 {
        (text.to_string(), style("[OK]").green())
    } else {
        (format!("{}, {} failed", text, failed), style("[WARN]").yellow())
    };

    if ctx.use_fancy_output() {
        let styled = if failed == 0 {
            style(text).green().bold()
        } else {
            style(text).yellow().bold()
        };
        let _ = cliclack::outro(styled);
    } else {
        println!();
        println!("{} {}", tag, text);
    }
}

pub fn config_written(ctx: &UiContext, path: &Path) {
    emit(ctx, Tone::Ok, &format!("Wrote default configuration to {}", path.display()));
}

pub fn config_exists(ctx: &UiContext, path: &Path) {
    emit(
        ctx,
        Tone::Warn,
        &format!("{} already exists, edit or delete it first", path.display()),
    );
}

fn describe_action(action: &Action) -> Option<String> {
    if action.is_noop() {
        return None;
    }

    let mut steps = Vec::new();
    if action.presence == Presence::FetchNew {
        steps.push(format!("download {}", action.filename()));
    }
    match &action.transition {
        CacheTransition::ReplaceStale {
            previous,
            shared: false,
        } => steps.push(format!("remove {}", previous)),
        CacheTransition::ReplaceStale {
            previous,
            shared: true,
        } => steps.push(format!("keep {}, another mod uses it", previous)),
        CacheTransition::Consistent | CacheTransition::Adopt => {}
    }
    Some(format!("{}: {}", action.identifier(), steps.join(", ")))
}

fn describe_outcome(outcome: &Outcome) -> Option<String> {
    if !outcome.changed() {
        return None;
    }

    let mut line = format!("{}: {} {}", outcome.identifier, outcome.label(), outcome.filename);
    if let (true, CacheTransition::ReplaceStale { previous, .. }) =
        (outcome.deleted, &outcome.transition)
    {
        line.push_str(&format!(", removed {}", previous));
    }
    Some(line)
}
