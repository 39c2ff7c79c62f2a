//! CLI for the imgdl batch image fetcher.

mod output;

use anyhow::{Context, Result};
use clap::Parser;
use imgdl_core::config::{self, ConnectionFailurePolicy, ImgdlConfig};
use imgdl_core::Fetcher;
use std::io::Write;
use std::path::PathBuf;
use tracing::Dispatch;

/// Download every image listed in a URL file.
#[derive(Debug, Parser)]
#[command(name = "imgdl")]
#[command(about = "imgdl: download the images listed in a plaintext URL file", long_about = None)]
pub struct Cli {
    /// File with one URL per line.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Existing directory the images are written to.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: PathBuf,

    /// Config file to use instead of ~/.config/imgdl/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fetch up to N URLs at once (overrides `workers` from the config).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Log unreachable URLs but leave them out of the failure report.
    #[arg(long)]
    pub ignore_connection_errors: bool,

    /// Print the failure report as JSON instead of tab-separated lines.
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON failure report to this file.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Config from `--config`, or the XDG config file (created with defaults if missing).
    pub fn load_config(&self) -> Result<ImgdlConfig> {
        match &self.config {
            Some(path) => config::load_from_path(path),
            None => config::load_or_init(),
        }
    }

    fn fetcher(&self, cfg: &ImgdlConfig, dispatch: Dispatch) -> Result<Fetcher> {
        let mut fetcher = Fetcher::from_config(cfg).with_dispatch(dispatch);
        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                anyhow::bail!("--jobs must be at least 1");
            }
            fetcher = fetcher.with_workers(jobs);
        }
        if self.ignore_connection_errors {
            fetcher = fetcher.with_connection_failures(ConnectionFailurePolicy::Ignore);
        }
        Ok(fetcher)
    }

    pub fn run(&self, cfg: &ImgdlConfig, dispatch: Dispatch) -> Result<()> {
        tracing::debug!("loaded config: {:?}", cfg);
        let fetcher = self.fetcher(cfg, dispatch)?;

        tracing::info!("starting download of {}", self.file.display());
        let report = fetcher.run(&self.file, &self.dir)?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        output::write_failures(&mut out, &report.failures, self.json)?;
        out.flush()?;
        eprintln!("{}", output::summary_line(&report));

        if let Some(path) = &self.report {
            output::write_json_report(path, &report.failures)
                .with_context(|| format!("failed to write report {}", path.display()))?;
        }
        tracing::info!("finished, {} failed URL(s)", report.failures.len());
        Ok(())
    }
}
