//! Output file naming.
//!
//! Names come straight from the final URL's last path segment; the only
//! adjustment is a fallback for names that would point at the output
//! directory itself.

mod path;

pub use path::derive_file_name;

/// Used when the URL has no usable last segment.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Returns `name` unless it is empty, `.` or `..`, in which case
/// [`DEFAULT_FILENAME`] is used.
pub fn file_name_or_default(name: &str) -> &str {
    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_FILENAME
    } else {
        name
    }
}

/// Name for the image fetched from `final_url`.
///
/// # Examples
///
/// - `output_file_name("https://example.com/img/cat.png")` → `"cat.png"`
/// - `output_file_name("https://example.com/")` → `"download.bin"`
pub fn output_file_name(final_url: &str) -> &str {
    file_name_or_default(derive_file_name(final_url))
}
