//! Error types for the chart API client.

use thiserror::Error;

/// Errors that can occur when fetching chart data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The provider reported that the symbol no longer trades.
    /// Callers treat this as a normal skip, not a failure.
    #[error("Symbol appears to be delisted")]
    Delisted,
    /// An HTTP request failed (connection refused, timeout, TLS error).
    #[error("Request failed")]
    Transport(#[from] reqwest::Error),
    /// The provider returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body could not be parsed into the expected chart shape.
    #[error("Failed to parse chart response: {0}")]
    Parse(String),
}

impl FetchError {
    /// True for the delisted classification; everything else is a
    /// transient or data error whose handling is decided by the caller.
    pub fn is_delisted(&self) -> bool {
        matches!(self, FetchError::Delisted)
    }
}
