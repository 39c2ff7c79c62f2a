//! Incremental parsing of response header lines into a ResponseHead.

/// Status and headers of a response, as far as the fetcher cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// HTTP status code of the last response in the redirect chain.
    pub status: u32,
    /// `Content-Type` value, if the server sent one.
    pub content_type: Option<String>,
    /// URL the body was actually served from (after redirects). Only known
    /// once the transfer has finished.
    pub effective_url: Option<String>,
}

impl ResponseHead {
    /// Feed one raw header line as delivered by libcurl (CRLF included).
    ///
    /// A status line starts a new response: every redirect hop delivers its own
    /// block of headers, and only the last block describes the body.
    pub(crate) fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            self.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse::<u32>().ok())
                .unwrap_or(0);
            self.content_type = None;
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                self.content_type = Some(value.trim().to_string());
            }
        }
    }
}
