//! File name extraction from a URL string.

/// Returns the part of `url` after the last `/`.
///
/// No parsing happens here: query strings and fragments stay attached, percent
/// escapes are not decoded, and a URL ending in `/` yields an empty string.
/// Without any `/` the whole input is returned.
pub fn derive_file_name(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}
