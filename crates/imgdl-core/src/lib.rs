pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod logging;
pub mod storage;
pub mod url_model;

pub use error::FetchError;
pub use fetcher::{fetch_all, BatchReport, FailureRecord, FailureStatus, Fetcher};
