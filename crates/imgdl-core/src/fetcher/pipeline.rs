//! One manifest line: GET, classify, persist.

use std::path::{Path, PathBuf};

use super::classify::{classify, is_redirect, Classification};
use crate::error::FetchError;
use crate::http::{Flow, HttpClient, TransferError};
use crate::storage::BodyWriter;
use crate::url_model::output_file_name;

/// What happened to a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    /// Image written to `path`.
    Saved { path: PathBuf, bytes: u64 },
    /// Reachable, 200, but not an image.
    Ignored { content_type: Option<String> },
    /// Non-200 status.
    Failed(u32),
    /// No HTTP exchange; carries the transport error message.
    Unreachable(String),
}

fn discard(writer: Option<BodyWriter>) {
    if let Some(w) = writer {
        w.discard();
    }
}

/// Fetch `url` into `output_dir`.
///
/// Only storage failures are returned as `Err`.
pub fn fetch_one(client: &HttpClient, url: &str, output_dir: &Path) -> Result<UrlOutcome, FetchError> {
    let mut writer: Option<BodyWriter> = None;

    let fetched = client.get(url, |head, chunk| {
        match classify(head.status, head.content_type.as_deref()) {
            Classification::Image => {}
            Classification::HttpFailure(code) if is_redirect(code) => return Ok(Flow::Continue),
            _ => return Ok(Flow::Stop),
        }
        if writer.is_none() {
            writer = Some(BodyWriter::create(output_dir)?);
        }
        if let Some(w) = writer.as_mut() {
            w.write_chunk(chunk)?;
        }
        Ok(Flow::Continue)
    });

    let head = match fetched {
        Ok(head) => head,
        Err(TransferError::Connection(e)) => {
            discard(writer);
            tracing::warn!(url, "connection failed, skipping line: {}", e);
            return Ok(UrlOutcome::Unreachable(e.to_string()));
        }
        Err(e @ TransferError::NoHttpStatus) => {
            discard(writer);
            tracing::warn!(url, "connection failed, skipping line: {}", e);
            return Ok(UrlOutcome::Unreachable(e.to_string()));
        }
        Err(TransferError::Sink(source)) => {
            let path = writer
                .as_ref()
                .map(|w| w.temp_path().to_path_buf())
                .unwrap_or_else(|| output_dir.to_path_buf());
            discard(writer);
            return Err(FetchError::Storage { path, source });
        }
    };

    match classify(head.status, head.content_type.as_deref()) {
        Classification::HttpFailure(code) => {
            discard(writer);
            tracing::debug!(url, status = code, "request failed");
            Ok(UrlOutcome::Failed(code))
        }
        Classification::NotImage => {
            discard(writer);
            tracing::warn!(
                url,
                "reachable but not an image, MIME type is {}",
                head.content_type.as_deref().unwrap_or("<none>")
            );
            Ok(UrlOutcome::Ignored {
                content_type: head.content_type,
            })
        }
        Classification::Image => {
            // Empty body: the chunk callback never ran.
            let writer = match writer {
                Some(w) => w,
                None => BodyWriter::create(output_dir).map_err(|source| FetchError::Storage {
                    path: output_dir.to_path_buf(),
                    source,
                })?,
            };
            let final_url = head.effective_url.as_deref().unwrap_or(url);
            let dest = output_dir.join(output_file_name(final_url));
            let bytes = writer
                .finalize(&dest)
                .map_err(|source| FetchError::Storage {
                    path: dest.clone(),
                    source,
                })?;
            tracing::debug!(url, path = %dest.display(), bytes, "saved image");
            Ok(UrlOutcome::Saved { path: dest, bytes })
        }
    }
}
