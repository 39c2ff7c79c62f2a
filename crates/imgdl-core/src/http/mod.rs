//! Blocking HTTP GET on top of libcurl.
//!
//! The body is handed to the caller chunk by chunk together with the response
//! head, so nothing is buffered beyond libcurl's receive buffer. A fresh
//! `Easy` handle is created per request; `HttpClient` itself only carries
//! options and is cheap to clone into worker threads.

mod head;

pub use head::ResponseHead;

use crate::config::ImgdlConfig;
use std::cell::RefCell;
use std::fmt;
use std::io;
use std::str;
use std::time::Duration;

/// Browser-like user agent; some servers reject libcurl's default one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Request options applied to every GET.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    /// Upper bound for a single body chunk, in bytes.
    pub buffer_size: usize,
    pub connect_timeout: Duration,
    /// Cap on the whole request. `None` lets large images take as long as
    /// they need; stalls are caught by the low-speed check instead.
    pub timeout: Option<Duration>,
    /// Abort when fewer than `low_speed_limit` bytes/s arrive for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirects: u32,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            buffer_size: 16 * 1024,
            connect_timeout: Duration::from_secs(15),
            timeout: None,
            low_speed_limit: 1,
            low_speed_time: Duration::from_secs(60),
            max_redirects: 10,
        }
    }
}

impl HttpOptions {
    pub fn from_config(cfg: &ImgdlConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            buffer_size: cfg.buffer_size,
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
            low_speed_limit: cfg.low_speed_limit,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            max_redirects: cfg.max_redirects,
        }
    }
}

/// What the body callback wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// End the transfer early. Not reported as an error.
    Stop,
}

/// Why a GET did not produce a response head.
#[derive(Debug)]
pub enum TransferError {
    /// Transport-level failure: DNS, refused, timeout, TLS, malformed URL,
    /// connection dropped mid-body.
    Connection(curl::Error),
    /// The transfer finished without an HTTP status line, e.g. a `file://`
    /// or `ftp://` URL.
    NoHttpStatus,
    /// The body callback failed to store a chunk.
    Sink(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Connection(e) => write!(f, "{}", e),
            TransferError::NoHttpStatus => write!(f, "no HTTP response"),
            TransferError::Sink(e) => write!(f, "write: {}", e),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Connection(e) => Some(e),
            TransferError::NoHttpStatus => None,
            TransferError::Sink(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    options: HttpOptions,
}

impl HttpClient {
    pub fn new(options: HttpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    /// GET `url`, following redirects, and feed each body chunk to `on_chunk`.
    ///
    /// `on_chunk` sees the head of the response the body belongs to (status
    /// and content type; `effective_url` is not known yet). Returning
    /// `Flow::Stop` ends the transfer quietly; returning an IO error aborts it
    /// with `TransferError::Sink`. The returned head additionally carries the
    /// effective URL. A transfer that never saw an HTTP status line fails with
    /// `TransferError::NoHttpStatus`.
    pub fn get<F>(&self, url: &str, mut on_chunk: F) -> Result<ResponseHead, TransferError>
    where
        F: FnMut(&ResponseHead, &[u8]) -> io::Result<Flow>,
    {
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)
            .map_err(TransferError::Connection)?;

        let head = RefCell::new(ResponseHead::default());
        let mut sink_error: Option<io::Error> = None;
        let mut stopped = false;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(line) = str::from_utf8(data) {
                        head.borrow_mut().push_line(line);
                    }
                    true
                })
                .map_err(TransferError::Connection)?;
            transfer
                .write_function(|data| {
                    let current = head.borrow();
                    match on_chunk(&*current, data) {
                        Ok(Flow::Continue) => Ok(data.len()),
                        Ok(Flow::Stop) => {
                            stopped = true;
                            Ok(0) // abort transfer
                        }
                        Err(e) => {
                            sink_error = Some(e);
                            Ok(0) // abort transfer
                        }
                    }
                })
                .map_err(TransferError::Connection)?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if !e.is_write_error() {
                return Err(TransferError::Connection(e));
            }
            if let Some(io_err) = sink_error {
                return Err(TransferError::Sink(io_err));
            }
            if !stopped {
                return Err(TransferError::Connection(e));
            }
        }

        // Parsed headers stay authoritative so the caller sees the same head
        // here as in `on_chunk`. libcurl's response_code would report FTP
        // codes for non-HTTP schemes.
        let mut head = head.into_inner();
        if head.status == 0 {
            return Err(TransferError::NoHttpStatus);
        }
        head.effective_url = easy
            .effective_url()
            .map_err(TransferError::Connection)?
            .map(str::to_string);
        Ok(head)
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        let opts = &self.options;
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(opts.max_redirects)?;
        easy.useragent(&opts.user_agent)?;
        easy.connect_timeout(opts.connect_timeout)?;
        if let Some(timeout) = opts.timeout {
            easy.timeout(timeout)?;
        }
        easy.low_speed_limit(opts.low_speed_limit)?;
        easy.low_speed_time(opts.low_speed_time)?;
        easy.buffer_size(opts.buffer_size)?;
        Ok(())
    }
}
