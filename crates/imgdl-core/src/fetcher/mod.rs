//! Batch image fetcher.
//!
//! Reads a manifest of URLs, GETs each one, and writes every `200 image/*`
//! response into the output directory. Lines that fail are collected into a
//! report in manifest order; lines that are reachable but not images are only
//! logged. A line never aborts the batch; a broken output directory does.

mod classify;
mod manifest;
mod pipeline;
mod pool;
mod report;

pub use classify::{classify, is_image_content_type, Classification};
pub use manifest::{parse_manifest, read_manifest};
pub use pipeline::{fetch_one, UrlOutcome};
pub use report::{FailureRecord, FailureStatus};

use std::path::Path;
use tracing::Dispatch;

use crate::config::{ConnectionFailurePolicy, ImgdlConfig};
use crate::error::FetchError;
use crate::http::{HttpClient, HttpOptions};

/// Summary of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Images written.
    pub saved: usize,
    /// Reachable non-image responses.
    pub ignored: usize,
    /// Lines with no HTTP exchange, whether or not they are in `failures`.
    pub unreachable: usize,
    /// Failed lines in manifest order.
    pub failures: Vec<FailureRecord>,
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HttpClient,
    workers: usize,
    connection_failures: ConnectionFailurePolicy,
    dispatch: Option<Dispatch>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::from_config(&ImgdlConfig::default())
    }
}

impl Fetcher {
    /// Sequential fetcher reporting connection failures.
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            workers: 1,
            connection_failures: ConnectionFailurePolicy::Report,
            dispatch: None,
        }
    }

    pub fn from_config(cfg: &ImgdlConfig) -> Self {
        Self::new(HttpClient::new(HttpOptions::from_config(cfg)))
            .with_workers(cfg.workers)
            .with_connection_failures(cfg.connection_failures)
    }

    /// Number of fetch threads (at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_connection_failures(mut self, policy: ConnectionFailurePolicy) -> Self {
        self.connection_failures = policy;
        self
    }

    /// Log through `dispatch` instead of the caller's current default.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn connection_failures(&self) -> ConnectionFailurePolicy {
        self.connection_failures
    }

    /// Fetch every URL in `input` into `output` and return the failed lines.
    pub fn fetch_all(&self, input: &Path, output: &Path) -> Result<Vec<FailureRecord>, FetchError> {
        self.run(input, output).map(|report| report.failures)
    }

    /// Like [`fetch_all`](Self::fetch_all) but with success/ignore counts.
    pub fn run(&self, input: &Path, output: &Path) -> Result<BatchReport, FetchError> {
        match &self.dispatch {
            Some(dispatch) => {
                tracing::dispatcher::with_default(dispatch, || self.run_batch(input, output))
            }
            None => self.run_batch(input, output),
        }
    }

    fn run_batch(&self, input: &Path, output: &Path) -> Result<BatchReport, FetchError> {
        check_paths(input, output)?;
        let urls = read_manifest(input)?;
        tracing::info!(
            lines = urls.len(),
            input = %input.display(),
            output = %output.display(),
            workers = self.workers,
            "starting batch"
        );

        let outcomes = if self.workers > 1 && urls.len() > 1 {
            let dispatch = tracing::dispatcher::get_default(|d| d.clone());
            pool::fetch_parallel(&self.client, &urls, output, self.workers, &dispatch)?
        } else {
            let mut outcomes = Vec::with_capacity(urls.len());
            for url in &urls {
                outcomes.push(fetch_one(&self.client, url, output)?);
            }
            outcomes
        };

        let report = self.summarize(urls, outcomes);
        tracing::info!(
            saved = report.saved,
            ignored = report.ignored,
            unreachable = report.unreachable,
            failed = report.failures.len(),
            "batch finished"
        );
        Ok(report)
    }

    fn summarize(&self, urls: Vec<String>, outcomes: Vec<UrlOutcome>) -> BatchReport {
        let mut report = BatchReport::default();
        for (url, outcome) in urls.into_iter().zip(outcomes) {
            match outcome {
                UrlOutcome::Saved { .. } => report.saved += 1,
                UrlOutcome::Ignored { .. } => report.ignored += 1,
                UrlOutcome::Failed(code) => report.failures.push(FailureRecord::http(url, code)),
                UrlOutcome::Unreachable(_) => {
                    report.unreachable += 1;
                    if self.connection_failures == ConnectionFailurePolicy::Report {
                        report.failures.push(FailureRecord::connection_error(url));
                    }
                }
            }
        }
        report
    }
}

/// Both checks happen before the manifest is read or any request is made.
fn check_paths(input: &Path, output: &Path) -> Result<(), FetchError> {
    if !input.exists() {
        return Err(FetchError::InputNotFound(input.to_path_buf()));
    }
    if !output.is_dir() {
        return Err(FetchError::NotADirectory(output.to_path_buf()));
    }
    Ok(())
}

/// Fetch with default settings. See [`Fetcher::fetch_all`].
pub fn fetch_all(input: &Path, output: &Path) -> Result<Vec<FailureRecord>, FetchError> {
    Fetcher::default().fetch_all(input, output)
}
