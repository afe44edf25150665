//! modsync - mods folder synchronizer
//!
//! CLI entry point.

use clap::Parser;
use console::style;
use modsync::cli::Cli;
use modsync::config::{Config, ConfigManager};
use modsync::error::{ModsyncError, ModsyncResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ModsyncResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    if cli.init_config {
        init_logging(cli.verbose, "text");
        return modsync::cli::commands::init_config(&config_manager).await;
    }

    let config = config_manager.load().await?;
    init_logging(cli.verbose, &config.general.log_format);
    debug!("Using config {}", config_manager.path().display());

    let config = apply_overrides(config, &cli)?;

    let target = cli
        .target
        .as_deref()
        .ok_or_else(|| ModsyncError::Internal("target directory missing".to_string()))?;

    modsync::cli::commands::sync(target, cli.dry_run, cli.format, &config).await
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug. `RUST_LOG` wins when set.
fn init_logging(verbose: u8, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("modsync=warn"),
        1 => EnvFilter::new("modsync=info"),
        _ => EnvFilter::new("modsync=debug"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

/// Command-line flags take precedence over the config file, which was
/// already validated on load, so a failure here names the flag.
fn apply_overrides(mut config: Config, cli: &Cli) -> ModsyncResult<Config> {
    if let Some(jobs) = cli.jobs {
        config.remote.concurrency = jobs;
        check_flag(&config, "--jobs")?;
    }
    if let Some(timeout) = cli.timeout {
        config.remote.timeout_secs = timeout;
        check_flag(&config, "--timeout")?;
    }
    if let Some(ref endpoint) = cli.endpoint {
        config.remote.endpoint = endpoint.clone();
        check_flag(&config, "--endpoint")?;
    }
    Ok(config)
}

fn check_flag(config: &Config, flag: &'static str) -> ModsyncResult<()> {
    ConfigManager::validate(config).map_err(|reason| ModsyncError::InvalidOption { flag, reason })
}
