//! Logging setup: stderr and/or a log file, returned as a `Dispatch`.
//!
//! Nothing here installs a global subscriber. The caller decides where the
//! dispatch is active (`tracing::dispatcher::with_default`) and hands it to the
//! [`Fetcher`](crate::fetcher::Fetcher) so worker threads log to the same place.

mod csv;

pub use csv::CsvFormat;

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogConfig, LogFormat};

/// `$XDG_STATE_HOME/imgdl/imgdl.log`, creating the directory.
pub fn default_log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.place_state_file("imgdl.log")?)
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

fn fmt_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Csv => layer.with_ansi(false).event_format(CsvFormat).boxed(),
    }
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir {}", parent.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Build a dispatch from `cfg`.
///
/// `RUST_LOG` takes precedence over `cfg.level`. Fails if the log file cannot
/// be opened, so the caller can fall back to [`stderr_dispatch`].
pub fn build_dispatch(cfg: &LogConfig) -> Result<Dispatch> {
    let file_layer = if cfg.file_logging {
        let path = match &cfg.file {
            Some(p) => p.clone(),
            None => default_log_path()?,
        };
        let file = open_log_file(&path)?;
        Some(fmt_layer(cfg.file_format, Mutex::new(file), false))
    } else {
        None
    };
    let console_layer = if cfg.console {
        Some(fmt_layer(cfg.format, io::stderr, true))
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(&cfg.level))
        .with(console_layer)
        .with(file_layer);
    Ok(Dispatch::new(subscriber))
}

/// Stderr-only dispatch for when [`build_dispatch`] fails, so the CLI doesn't crash.
pub fn stderr_dispatch() -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(io::stderr)
        .with_ansi(false)
        .finish();
    Dispatch::new(subscriber)
}

/// Log panics at error level through the current dispatch, then run the
/// previous hook. Worker threads carry the fetcher's dispatch, so their panics
/// reach the log file too.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("panic: {}", info);
        previous(info);
    }));
}
