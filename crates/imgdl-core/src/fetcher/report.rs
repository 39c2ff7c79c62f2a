//! Failure report entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a manifest line ended up in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStatus {
    /// The server answered with a status other than 200.
    Http(u32),
    /// No HTTP exchange happened (DNS, refused, timeout, TLS, malformed URL).
    ConnectionError,
}

impl FailureStatus {
    /// HTTP status code, if there was a response at all.
    pub fn code(&self) -> Option<u32> {
        match self {
            FailureStatus::Http(code) => Some(*code),
            FailureStatus::ConnectionError => None,
        }
    }
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStatus::Http(code) => write!(f, "{}", code),
            FailureStatus::ConnectionError => write!(f, "connection error"),
        }
    }
}

/// One failed manifest line: the URL as written (trimmed) and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub url: String,
    pub status: FailureStatus,
}

impl FailureRecord {
    pub fn http(url: impl Into<String>, code: u32) -> Self {
        Self {
            url: url.into(),
            status: FailureStatus::Http(code),
        }
    }

    pub fn connection_error(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: FailureStatus::ConnectionError,
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.url, self.status)
    }
}
