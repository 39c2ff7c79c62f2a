//! Bounded worker pool over the manifest.
//!
//! Workers pop `(index, url)` pairs from a shared queue and send results back
//! over a channel; results are sorted by index before returning, so callers
//! see manifest order. After a storage failure no new lines are started.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use tracing::Dispatch;

use super::pipeline::{fetch_one, UrlOutcome};
use crate::error::FetchError;
use crate::http::HttpClient;

/// Fetch `urls` with up to `workers` threads, each logging through `dispatch`.
///
/// Returns one outcome per URL in input order, or the first storage error by
/// manifest position.
pub fn fetch_parallel(
    client: &HttpClient,
    urls: &[String],
    output_dir: &Path,
    workers: usize,
    dispatch: &Dispatch,
) -> Result<Vec<UrlOutcome>, FetchError> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }
    let work: Arc<Mutex<VecDeque<(usize, String)>>> =
        Arc::new(Mutex::new(urls.iter().cloned().enumerate().collect()));
    let abort = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    let num_workers = workers.max(1).min(urls.len());
    let mut handles = Vec::with_capacity(num_workers);

    for _ in 0..num_workers {
        let work = Arc::clone(&work);
        let abort = Arc::clone(&abort);
        let tx = tx.clone();
        let client = client.clone();
        let dir = output_dir.to_path_buf();
        let dispatch = dispatch.clone();
        handles.push(std::thread::spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || loop {
                if abort.load(Ordering::Relaxed) {
                    break;
                }
                let next = match work.lock() {
                    Ok(mut queue) => queue.pop_front(),
                    Err(_) => None,
                };
                let (index, url) = match next {
                    Some(p) => p,
                    None => break,
                };
                let res = fetch_one(&client, &url, &dir);
                if res.is_err() {
                    abort.store(true, Ordering::Relaxed);
                }
                if tx.send((index, res)).is_err() {
                    break;
                }
            })
        }));
    }
    drop(tx);

    let mut results: Vec<(usize, Result<UrlOutcome, FetchError>)> = rx.iter().collect();
    for handle in handles {
        if let Err(panic) = handle.join() {
            std::panic::resume_unwind(panic);
        }
    }

    // Lines are popped in order, so any line that never ran comes after the
    // failing one and the error is reached first.
    results.sort_by_key(|(index, _)| *index);
    let mut outcomes = Vec::with_capacity(urls.len());
    for (_, res) in results {
        outcomes.push(res?);
    }
    debug_assert_eq!(outcomes.len(), urls.len());
    Ok(outcomes)
}
