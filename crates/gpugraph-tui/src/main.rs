//! `gpugraph`: live terminal dashboard of GPU utilization and memory.
//!
//! One bordered pane per GPU, laid out in a grid that follows the terminal's
//! size. Each pane plots recent utilization as a line chart next to a column
//! showing memory in use. Telemetry comes from `nvidia-smi`, or from a
//! synthetic source with `--demo`.
//!
//! Logs are written to a file (default `<tmp>/gpugraph.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, configuration, tracing setup, panic
//! hooks, and app launch.

mod app;
mod event;
mod theme;
mod tui;
mod ui;
mod widgets;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use gpugraph_config::{Config, Overrides};
use gpugraph_core::telemetry::snapshot_within;
use gpugraph_core::{DashboardSession, NvidiaSmi, SyntheticSource, TelemetrySource};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Live terminal dashboard of GPU utilization and memory.
#[derive(Parser, Debug)]
#[command(name = "gpugraph", version, about)]
struct Cli {
    /// Seconds between refreshes [default: 1.0]
    #[arg(short, long, value_name = "SECONDS")]
    interval: Option<f64>,

    /// Path to the nvidia-smi executable
    #[arg(long, value_name = "PATH")]
    nvidia_smi: Option<PathBuf>,

    /// Show N synthetic GPUs instead of querying the driver
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=64))]
    demo: Option<u32>,

    /// Draw with attributes only, no colors
    #[arg(long)]
    no_color: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file path (defaults to <tmp>/gpugraph.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            interval_secs: self.interval,
            nvidia_smi: self.nvidia_smi.clone(),
            color: self.no_color.then_some(false),
            log_file: self.log_file.clone(),
        }
    }
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr, that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("gpugraph={log_level},gpugraph_core={log_level}"))
    });

    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("gpugraph.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Take the startup snapshot, build the session and hand both to the app.
async fn run<S: TelemetrySource>(mut source: S, config: &Config) -> Result<()> {
    info!(
        source = %source.describe(),
        interval = %humantime::format_duration(config.tick_interval()),
        "starting gpugraph"
    );

    let initial = snapshot_within(&mut source, config.telemetry_timeout())
        .await
        .wrap_err_with(|| format!("failed to query {}", source.describe()))?;

    let (cols, lines) = crossterm::terminal::size().unwrap_or((80, 24));
    let session = DashboardSession::start(&initial, lines, cols, config.session_settings())?;

    let mut app = App::new(session, source, config);
    app.run().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let overrides = cli.overrides();
    let config = match &cli.config {
        Some(path) => gpugraph_config::load_config_from(path, &overrides),
        None => gpugraph_config::load_config(&overrides),
    }
    .wrap_err("invalid configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&config.log_file, cli.verbose);

    match cli.demo {
        Some(count) => run(SyntheticSource::new(count), &config).await,
        None => run(NvidiaSmi::new(&config.nvidia_smi), &config).await,
    }
}
