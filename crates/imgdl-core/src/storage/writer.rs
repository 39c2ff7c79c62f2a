//! Sequential chunk writer for a single response body.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use super::{TEMP_PREFIX, TEMP_SUFFIX};

/// Writes a response body chunk by chunk into a uniquely named temp file in
/// the output directory.
///
/// The temp file is deleted when the writer is discarded or dropped without
/// being finalized.
pub struct BodyWriter {
    file: NamedTempFile,
    written: u64,
}

impl BodyWriter {
    /// Create a fresh temp file in `output_dir`.
    pub fn create(output_dir: &Path) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(output_dir)?;
        Ok(BodyWriter { file, written: 0 })
    }

    /// Append one chunk.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Flush and move onto `final_path`, replacing any existing file.
    /// Returns the body size. The temp file is removed if this fails.
    pub fn finalize(mut self, final_path: &Path) -> io::Result<u64> {
        self.file.flush()?;
        self.file.persist(final_path).map_err(|e| e.error)?;
        Ok(self.written)
    }

    /// Close and delete the temp file.
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::debug!(path = %path.display(), "could not remove temp file: {}", e);
        }
    }
}
