//! Disk side of a download.
//!
//! The body is streamed into a hidden temp file inside the output directory and
//! moved onto its final name once the response has been classified as an
//! image. Moving replaces any file of the same name. Temp names are random, so
//! concurrent batches into one directory never share a temp file.

mod writer;

pub use writer::BodyWriter;

pub const TEMP_PREFIX: &str = ".imgdl-";
pub const TEMP_SUFFIX: &str = ".part";
