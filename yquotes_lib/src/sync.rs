//! The per-run synchronization loop.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use yquotes_api::types::ChartResult;
use yquotes_api::{ChartClient, FetchError};

use crate::archive::Archiver;
use crate::calendar::DateCache;
use crate::dataset::TickerDataset;
use crate::error::SyncError;
use crate::merge::merge_chart;
use crate::store::DatasetStore;
use crate::window::{plan_fetch, FetchPlan};

/// Fetch seam for the orchestrator, mockable in tests.
#[async_trait]
pub trait QuoteFetcher {
    async fn fetch(
        &self,
        ticker: &str,
        period1: i64,
        period2: i64,
    ) -> Result<ChartResult, FetchError>;
}

#[async_trait]
impl QuoteFetcher for ChartClient {
    async fn fetch(
        &self,
        ticker: &str,
        period1: i64,
        period2: i64,
    ) -> Result<ChartResult, FetchError> {
        self.get_chart(ticker, period1, period2).await
    }
}

/// What to do when a fetch fails with something other than a delisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run and surface the failure.
    AbortRun,
    /// Write an `{"error": "..."}` marker for the ticker and continue.
    MarkAndContinue,
}

/// Per-run settings for the orchestrator.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// The calendar day the run treats as "today".
    pub today: NaiveDate,
    /// Delay applied after every successful write, pacing requests
    /// against the provider's implicit rate limits.
    pub pacing: Duration,
    pub failure_policy: FailurePolicy,
}

/// Per-ticker outcome counts for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Tickers fetched, merged, and written.
    pub synced: usize,
    /// Tickers already current or with no trading data in the window.
    pub skipped: usize,
    /// Tickers the provider reported as no longer trading.
    pub delisted: usize,
    /// Tickers marked with an error under `MarkAndContinue`.
    pub failed: usize,
}

/// Runs one synchronization pass over the ticker list, strictly in
/// order, one ticker at a time.
///
/// Per ticker: load the stored dataset, derive the fetch window, fetch,
/// merge, write. Delisted instruments are skipped silently. Other fetch
/// failures follow the configured [`FailurePolicy`]. Storage failures
/// abort the run. When an archiver is supplied, every current dataset
/// file (freshly written or skipped-as-current) is registered with it.
pub async fn run_sync<F>(
    tickers: &[String],
    fetcher: &F,
    store: &mut dyn DatasetStore,
    mut archiver: Option<&mut dyn Archiver>,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError>
where
    F: QuoteFetcher + Sync,
{
    if tickers.is_empty() {
        return Err(SyncError::Config("ticker list is empty".to_string()));
    }

    let mut dates = DateCache::new();
    let mut report = SyncReport::default();

    for ticker in tickers {
        let key = ticker.to_uppercase();
        let existing_bytes = store.read(&key)?;
        // An unparseable file (including a previous run's error marker)
        // is treated as no dataset.
        let existing: Option<TickerDataset> = existing_bytes
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok());

        let (mut period1, period2) = match plan_fetch(options.today, existing.as_ref(), &mut dates)
        {
            FetchPlan::Skip => {
                tracing::debug!(ticker = %key, "Already current, skipping");
                if let (Some(archiver), Some(bytes)) =
                    (archiver.as_deref_mut(), existing_bytes.as_deref())
                {
                    archiver.add(&format!("{}.json", key), bytes)?;
                }
                report.skipped += 1;
                continue;
            }
            FetchPlan::Window { period1, period2 } => (period1, period2),
        };

        let mut outcome = fetcher.fetch(&key, period1, period2).await;

        // A first-ever fetch requested the default one-day window; if
        // the instrument's true first trade date differs, widen and
        // re-fetch once to backfill from the earliest edge.
        if existing.is_none() {
            if let Ok(result) = &outcome {
                let first_trade = result.meta.as_ref().and_then(|meta| meta.first_trade_date);
                if let Some(first_trade) = first_trade {
                    if first_trade != period1 {
                        tracing::info!(
                            ticker = %key,
                            first_trade,
                            "Widening window to first trade date"
                        );
                        period1 = first_trade;
                        outcome = fetcher.fetch(&key, period1, period2).await;
                    }
                }
            }
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) if e.is_delisted() => {
                tracing::info!(ticker = %key, "Delisted, skipping");
                report.delisted += 1;
                continue;
            }
            Err(e) => match options.failure_policy {
                FailurePolicy::AbortRun => {
                    return Err(SyncError::Fetch {
                        ticker: key,
                        source: e,
                    });
                }
                FailurePolicy::MarkAndContinue => {
                    tracing::warn!(ticker = %key, "Fetch failed, writing error marker: {}", e);
                    let marker = serde_json::json!({ "error": e.to_string() });
                    // Marker writes are best-effort; a failure here must
                    // not take down the run.
                    if let Err(write_err) = store.write(&key, marker.to_string().as_bytes()) {
                        tracing::warn!(ticker = %key, "Failed to write error marker: {}", write_err);
                    }
                    report.failed += 1;
                    continue;
                }
            },
        };

        let dataset = merge_chart(&result, &mut dates);
        if dataset.last_updated.is_none() {
            tracing::debug!(ticker = %key, "No trading data in window, nothing to write");
            report.skipped += 1;
            continue;
        }

        let bytes = serde_json::to_vec(&dataset)?;
        store.write(&key, &bytes)?;
        if let Some(archiver) = archiver.as_deref_mut() {
            archiver.add(&format!("{}.json", key), &bytes)?;
        }
        tracing::info!(
            ticker = %key,
            quotes = dataset.quote.len(),
            last_updated = dataset.last_updated,
            "Dataset written"
        );
        report.synced += 1;

        tokio::time::sleep(options.pacing).await;
    }

    Ok(report)
}
