//! Sync engine for per-ticker daily quote datasets.
//!
//! Wraps the `yquotes_api` chart client with the incremental
//! synchronization logic: per-ticker fetch-window derivation, merging of
//! provider responses into stored datasets, dividend flagging, and the
//! orchestration loop with per-ticker failure isolation.

pub mod archive;
pub mod calendar;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod store;
pub mod sync;
pub mod tickers;
pub mod window;

pub use yquotes_api;
pub use yquotes_api::{ChartClient, FetchError};

pub use archive::{Archiver, ZipArchiver};
pub use calendar::DateCache;
pub use dataset::{DatasetMeta, QuoteRecord, TickerDataset};
pub use error::SyncError;
pub use store::{DatasetStore, LocalStore};
pub use sync::{run_sync, FailurePolicy, QuoteFetcher, SyncOptions, SyncReport};
pub use window::{plan_fetch, FetchPlan};
