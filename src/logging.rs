//! Process log stream: every record goes to stdout and to a fixed log file.
//!
//! `RUST_LOG` filters both outputs (default `info`). The file writer runs on a
//! background thread; the returned [`LogGuard`] must stay alive until the
//! process is about to exit or buffered lines are lost.

use anyhow::{anyhow, Context};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub struct LogGuard {
    _file: WorkerGuard,
}

pub fn init_logging(log_file: &Path) -> anyhow::Result<LogGuard> {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = log_file
        .file_name()
        .ok_or_else(|| anyhow!("log path {} has no file name", log_file.display()))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    // Appends to the same file on every run, no rotation.
    let appender = tracing_appender::rolling::never(dir, name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter());

    let stdout_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
