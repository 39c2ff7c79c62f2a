//! Reading the URL list.

use std::fs;
use std::path::Path;

use crate::error::FetchError;

/// Trimmed, non-empty lines of `text`, in order. Handles `\n` and `\r\n`.
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse the whole manifest before any request is made.
pub fn read_manifest(path: &Path) -> Result<Vec<String>, FetchError> {
    let text = fs::read_to_string(path).map_err(|source| FetchError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_manifest(&text))
}
