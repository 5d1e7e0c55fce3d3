//! Error types for the sync engine.

use thiserror::Error;
use yquotes_api::FetchError;

/// Errors produced by the sync engine. Storage and configuration
/// failures are fatal for the whole run; fetch failures are only
/// surfaced here when the abort-run policy is active.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The dataset store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    /// The ticker list is missing, unreadable, or empty.
    #[error("Configuration error: {0}")]
    Config(String),
    /// A fetch failed under the abort-run policy.
    #[error("Fetch failed for {ticker}: {source}")]
    Fetch {
        ticker: String,
        #[source]
        source: FetchError,
    },
    /// A dataset could not be serialized for writing.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The archive could not be created or written.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}
